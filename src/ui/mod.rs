pub mod commands;

pub use commands::Shell;

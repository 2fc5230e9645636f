pub mod browser;
pub mod scanner;
pub mod store;

pub use browser::PresetBrowser;
pub use store::PresetStore;

pub mod flag_loader;

pub struct Loader;

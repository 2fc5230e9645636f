pub mod file_kind;
pub mod selection;

pub use file_kind::FileKind;
pub use selection::{Selection, SelectionField};

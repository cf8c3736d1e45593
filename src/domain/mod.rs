pub mod status;
pub mod types;

pub use status::StatusLabel;
pub use types::{ChangeRecord, StateMap};

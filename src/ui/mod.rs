pub mod focus;

pub use focus::{ColumnsForRow, GridFocusManager, LinearFocusManager};

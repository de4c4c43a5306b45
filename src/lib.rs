// Library entry shared by the binary and the integration tests

pub mod config;
pub mod constants;
pub mod data;
pub mod models;
pub mod player;
pub mod storage;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use utils::{AppError, Result};

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod reporting;
pub mod source;
#[cfg(test)]
pub mod test_helpers;

pub use error::{ReportError, Result};

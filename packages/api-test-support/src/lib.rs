//! Shared helpers for the ledger API integration tests: logging setup,
//! error-body assertions and unique test data.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;

pub use error_body::assert_error_body;
pub use unique_helpers::{unique_str, unique_username};

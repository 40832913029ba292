//! Gatehouse test support utilities
//!
//! Shared helpers for the gatehouse integration tests: unified logging
//! initialization and unique test data generation.

pub mod test_logging;
pub mod unique_helpers;

pub use test_logging as logging;

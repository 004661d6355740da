//! End-to-end test support for the ebbing workspace
//!
//! - [`harness`]: isolated item stores in temporary directories
//! - [`mocks`]: item and vault factories

pub mod harness;
pub mod mocks;

pub use harness::TestStoreManager;
pub use mocks::{TestDataFactory, TestScenario};

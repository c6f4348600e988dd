//! Common test utilities for society-portal
//!
//! - Portal fixtures over an in-memory or SQLite document store
//! - A deterministic card photo source
//! - Assertions on the JSON error envelope

pub mod assertions;
pub mod database;
pub mod fixtures;

pub use database::TestDatabase;
pub use fixtures::{StubPhotos, TestPortal};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

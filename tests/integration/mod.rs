//! Integration tests for society-portal
//!
//! Each test drives the full actix app: middleware, route guards, services
//! and a real document store.

pub mod access_tests;
pub mod card_tests;
pub mod content_tests;
pub mod dashboard_tests;
pub mod database_tests;

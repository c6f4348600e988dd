//! HTTP server implementation
//!
//! This module provides the HTTP server, its middleware and the route table.

pub mod builder;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
mod utils;


pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;

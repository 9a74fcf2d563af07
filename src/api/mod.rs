//! REST API surface for the aggregation service.
//!
//! JSON in, JSON out; one route handler per extractor.

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{build_router, start_http_server, AppState};

//! HTTP API: authorization middleware, request helpers, error mapping and
//! server lifecycle over axum.

pub mod app;
pub mod context;
pub mod errors;
pub mod middleware;
pub mod request;
pub mod server;

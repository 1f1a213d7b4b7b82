//! `chassis-core` — shared foundation for the API chassis.
//!
//! This crate contains the error taxonomy and the environment accessor.
//! It is intentionally free of HTTP-framework and crypto concerns.

pub mod env;
pub mod error;

pub use env::{Environment, RuntimeEnv};
pub use error::{ConfigError, ResponseError};

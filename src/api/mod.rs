//! Typed client for the grid backend's HTTP API.
//!
//! Wraps four endpoints:
//! - `GET /health`: backend and component health
//! - `GET /api/v1/physics/info`: physics engine parameters
//! - `POST /api/v1/analysis/validate`: energy conservation analysis
//! - `GET /`: service name, version and capabilities

mod client;
mod error;
mod policy;
/// Request and response schemas.
pub mod types;

pub use client::ApiClient;
pub use error::{ANALYSIS_FAILED, ApiError, Operation};
pub use policy::{RequestPolicy, RetryPolicy};

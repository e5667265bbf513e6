//! Typed client, status aggregator and terminal dashboard for the
//! UrjaRakshak grid backend.

/// HTTP client, request policy and wire schemas.
pub mod api;
pub mod cli;
pub mod config;
pub mod io;
pub mod logging;
pub mod platform;
/// Concurrent health and physics polling.
pub mod status;
#[cfg(feature = "tui")]
pub mod tui;

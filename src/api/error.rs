//! Uniform error contract for backend operations.

use std::fmt;

/// Fallback message when the analysis endpoint gives no `detail`.
pub const ANALYSIS_FAILED: &str = "Analysis failed";

/// Backend operation, used to label errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    PhysicsInfo,
    ServiceInfo,
    Analysis,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Health => "health",
            Self::PhysicsInfo => "physics info",
            Self::ServiceInfo => "service info",
            Self::Analysis => "analysis",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by [`ApiClient`](super::ApiClient) operations.
///
/// HTTP and network failures collapse to a fixed message per operation.
/// Only the analysis endpoint forwards a backend-provided message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Health check failed")]
    HealthCheckFailed,

    #[error("Physics info request failed")]
    PhysicsInfoFailed,

    #[error("Service info request failed")]
    ServiceInfoFailed,

    /// Carries the backend's `detail`, or [`ANALYSIS_FAILED`].
    #[error("{0}")]
    AnalysisFailed(String),

    #[error("invalid {operation} response: {message}")]
    InvalidResponse { operation: Operation, message: String },

    #[error("{operation} request timed out after {timeout_ms} ms")]
    Timeout { operation: Operation, timeout_ms: u64 },

    #[error("{operation} request cancelled")]
    Cancelled { operation: Operation },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// The fixed failure for an operation whose request did not succeed.
    pub fn failed(operation: Operation) -> Self {
        match operation {
            Operation::Health => Self::HealthCheckFailed,
            Operation::PhysicsInfo => Self::PhysicsInfoFailed,
            Operation::ServiceInfo => Self::ServiceInfoFailed,
            Operation::Analysis => Self::AnalysisFailed(ANALYSIS_FAILED.to_string()),
        }
    }
}

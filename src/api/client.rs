//! HTTP client for the grid backend.

use std::future::Future;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::{ANALYSIS_FAILED, ApiError, Operation};
use super::policy::{RequestPolicy, whole_millis};
use super::types::{AnalysisRequest, AnalysisResult, ErrorBody, HealthResponse, PhysicsInfo, ServiceInfo};
use crate::config::ClientConfig;

const HEALTH_PATH: &str = "/health";
const PHYSICS_INFO_PATH: &str = "/api/v1/physics/info";
const ANALYSIS_PATH: &str = "/api/v1/analysis/validate";
const SERVICE_INFO_PATH: &str = "/";

/// Typed client for the backend's HTTP API.
///
/// The base URL and request policy are fixed at construction; operations
/// never consult the environment. Cloning is cheap and shares the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    policy: RequestPolicy,
    cancel: Option<CancellationToken>,
}

/// A completed exchange: status line and full body.
struct Reply {
    status: StatusCode,
    body: String,
}

/// Why a single request did not produce a 2xx reply.
enum Failure {
    Transport(reqwest::Error),
    Status(Reply),
    Timeout,
    Cancelled,
}

impl Failure {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Status(reply) => reply.status.is_server_error(),
            Self::Cancelled => false,
        }
    }
}

impl ApiClient {
    /// Builds a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_policy(config.api.base_url.clone(), config.request_policy())
    }

    /// Builds a client for `base_url` with an explicit request policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be created.
    pub fn with_policy(base_url: impl Into<String>, policy: RequestPolicy) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url.into()),
            policy,
            cancel: None,
        })
    }

    /// Attaches a cancellation token checked by every operation.
    ///
    /// Once the token is cancelled, in-flight and future operations fail
    /// with [`ApiError::Cancelled`].
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The resolved base URL, normalized with trailing slashes removed.
    ///
    /// Operation paths are appended directly, so `http://host:8000/` and
    /// `http://host:8000` both yield `http://host:8000`.
    pub fn api_url(&self) -> &str {
        &self.base_url
    }

    /// The request policy applied to every operation.
    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// [`ApiError::HealthCheckFailed`] on any non-2xx or network failure.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json(Operation::Health, HEALTH_PATH).await
    }

    /// `GET /api/v1/physics/info`.
    ///
    /// # Errors
    ///
    /// [`ApiError::PhysicsInfoFailed`] on any non-2xx or network failure.
    pub async fn physics_info(&self) -> Result<PhysicsInfo, ApiError> {
        self.get_json(Operation::PhysicsInfo, PHYSICS_INFO_PATH).await
    }

    /// `GET /`: backend name, version and advertised capabilities.
    ///
    /// # Errors
    ///
    /// [`ApiError::ServiceInfoFailed`] on any non-2xx or network failure.
    pub async fn service_info(&self) -> Result<ServiceInfo, ApiError> {
        self.get_json(Operation::ServiceInfo, SERVICE_INFO_PATH).await
    }

    /// `POST /api/v1/analysis/validate` with `request` as the JSON body.
    ///
    /// The request is forwarded as-is; the backend does all validation.
    ///
    /// # Errors
    ///
    /// [`ApiError::AnalysisFailed`] carrying the backend's `detail` when the
    /// response is non-2xx, or `"Analysis failed"` when no detail is given.
    pub async fn analyze_grid(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ApiError> {
        let op = Operation::Analysis;
        let url = self.endpoint(ANALYSIS_PATH);
        match self.execute(op, || self.http.post(&url).json(request)).await {
            Ok(reply) => decode(op, &reply.body),
            Err(Failure::Status(reply)) => {
                warn!(operation = %op, status = %reply.status, "backend rejected analysis");
                Err(ApiError::AnalysisFailed(analysis_detail(&reply.body)))
            }
            Err(other) => Err(self.to_api_error(op, other)),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, op: Operation, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let reply = self
            .execute(op, || self.http.get(&url))
            .await
            .map_err(|f| self.to_api_error(op, f))?;
        decode(op, &reply.body)
    }

    fn to_api_error(&self, op: Operation, failure: Failure) -> ApiError {
        match failure {
            Failure::Transport(e) => {
                warn!(operation = %op, error = %e, "request failed");
                ApiError::failed(op)
            }
            Failure::Status(reply) => {
                warn!(operation = %op, status = %reply.status, "non-success response");
                ApiError::failed(op)
            }
            Failure::Timeout => ApiError::Timeout {
                operation: op,
                timeout_ms: self.policy.timeout_ms(),
            },
            Failure::Cancelled => ApiError::Cancelled { operation: op },
        }
    }

    /// Runs attempts built by `build` until one succeeds or the retry
    /// policy gives up.
    async fn execute<F>(&self, op: Operation, build: F) -> Result<Reply, Failure>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            debug!(operation = %op, attempt = attempt + 1, "sending request");
            let failure = match self.attempt(build()).await {
                Ok(reply) => return Ok(reply),
                Err(failure) => failure,
            };
            if !failure.is_retryable() || !self.policy.retry.allows_retry(attempt) {
                return Err(failure);
            }

            let delay = self.policy.retry.backoff(attempt);
            warn!(
                operation = %op,
                attempt = attempt + 1,
                delay_ms = whole_millis(delay),
                "attempt failed, retrying"
            );
            self.cancellable(tokio::time::sleep(delay)).await?;
            attempt += 1;
        }
    }

    async fn attempt(&self, request: reqwest::RequestBuilder) -> Result<Reply, Failure> {
        let exchange = async {
            let response = request.send().await.map_err(Failure::Transport)?;
            let status = response.status();
            let body = response.text().await.map_err(Failure::Transport)?;
            Ok::<_, Failure>(Reply { status, body })
        };
        let bounded = async {
            match self.policy.timeout {
                Some(limit) => tokio::time::timeout(limit, exchange)
                    .await
                    .map_err(|_| Failure::Timeout)?,
                None => exchange.await,
            }
        };

        let reply = self.cancellable(bounded).await??;
        if reply.status.is_success() {
            Ok(reply)
        } else {
            Err(Failure::Status(reply))
        }
    }

    async fn cancellable<T>(&self, fut: impl Future<Output = T>) -> Result<T, Failure> {
        match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => Err(Failure::Cancelled),
                out = fut => Ok(out),
            },
            None => Ok(fut.await),
        }
    }
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

fn decode<T: DeserializeOwned>(op: Operation, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse {
        operation: op,
        message: e.to_string(),
    })
}

/// Extracts the message for a rejected analysis from the response body.
///
/// String `detail` is used verbatim; structured detail (validation error
/// lists) is rendered as compact JSON.
fn analysis_detail(body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);
    match detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s,
        Some(serde_json::Value::String(_) | serde_json::Value::Null) | None => {
            ANALYSIS_FAILED.to_string()
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/".to_string()),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("https://api.example.org//".to_string()),
            "https://api.example.org"
        );
    }

    #[test]
    fn endpoints_join_base_and_path() {
        let client = ApiClient::with_policy("http://grid.local:9000/", RequestPolicy::default())
            .expect("client should build");
        assert_eq!(client.endpoint(HEALTH_PATH), "http://grid.local:9000/health");
        assert_eq!(
            client.endpoint(ANALYSIS_PATH),
            "http://grid.local:9000/api/v1/analysis/validate"
        );
    }

    #[test]
    fn analysis_detail_string_is_verbatim() {
        let body = r#"{"detail":"input_energy_mwh must be positive"}"#;
        assert_eq!(analysis_detail(body), "input_energy_mwh must be positive");
    }

    #[test]
    fn analysis_detail_falls_back() {
        assert_eq!(analysis_detail(r#"{"error":"nope"}"#), ANALYSIS_FAILED);
        assert_eq!(analysis_detail(r#"{"detail":null}"#), ANALYSIS_FAILED);
        assert_eq!(analysis_detail(r#"{"detail":""}"#), ANALYSIS_FAILED);
        assert_eq!(analysis_detail("<html>bad gateway</html>"), ANALYSIS_FAILED);
        assert_eq!(analysis_detail(""), ANALYSIS_FAILED);
    }

    #[test]
    fn analysis_detail_structured_is_json() {
        let body = r#"{"detail":[{"loc":["body","input_energy_mwh"],"msg":"must be > 0"}]}"#;
        let message = analysis_detail(body);
        assert!(message.starts_with('['));
        assert!(message.contains("must be > 0"));
    }

    #[test]
    fn only_transient_failures_retry() {
        let server_error = Failure::Status(Reply {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        });
        let client_error = Failure::Status(Reply {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: String::new(),
        });
        assert!(server_error.is_retryable());
        assert!(!client_error.is_retryable());
        assert!(Failure::Timeout.is_retryable());
        assert!(!Failure::Cancelled.is_retryable());
    }

    #[test]
    fn api_url_is_stable() {
        let client = ApiClient::with_policy("http://localhost:8000", RequestPolicy::default())
            .expect("client should build");
        assert_eq!(client.api_url(), client.api_url());
    }
}

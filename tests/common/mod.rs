//! Shared test fixtures: an in-process mock of the grid backend.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Delays the response by `ms` milliseconds.
    pub fn after_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

/// Responses per route. Call `n` gets reply `n`; the last reply repeats.
/// A route with no replies answers 404.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub service: Vec<Canned>,
    pub health: Vec<Canned>,
    pub physics: Vec<Canned>,
    pub analysis: Vec<Canned>,
}

impl Script {
    /// All read endpoints answer 200 with the sample payloads.
    pub fn healthy() -> Self {
        Self {
            service: vec![Canned::json(200, service_json())],
            health: vec![Canned::json(200, health_json())],
            physics: vec![Canned::json(200, physics_json())],
            analysis: vec![Canned::json(200, analysis_json())],
        }
    }
}

struct Route {
    replies: Vec<Canned>,
    hits: AtomicUsize,
}

impl Route {
    fn new(replies: Vec<Canned>) -> Self {
        Self {
            replies,
            hits: AtomicUsize::new(0),
        }
    }

    async fn respond(&self) -> Response {
        let n = self.hits.fetch_add(1, Ordering::SeqCst);
        let Some(canned) = self.replies.get(n).or(self.replies.last()).cloned() else {
            return StatusCode::NOT_FOUND.into_response();
        };
        if !canned.delay.is_zero() {
            tokio::time::sleep(canned.delay).await;
        }
        (
            canned.status,
            [(header::CONTENT_TYPE, "application/json")],
            canned.body,
        )
            .into_response()
    }
}

struct Shared {
    service: Route,
    health: Route,
    physics: Route,
    analysis: Route,
    last_analysis_body: Mutex<Option<Value>>,
}

/// Which route to inspect.
#[derive(Debug, Clone, Copy)]
pub enum Endpoint {
    Service,
    Health,
    Physics,
    Analysis,
}

/// A running mock backend bound to an ephemeral local port.
pub struct MockBackend {
    pub url: String,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn spawn(script: Script) -> Self {
        let shared = Arc::new(Shared {
            service: Route::new(script.service),
            health: Route::new(script.health),
            physics: Route::new(script.physics),
            analysis: Route::new(script.analysis),
            last_analysis_body: Mutex::new(None),
        });

        let app = Router::new()
            .route("/", get(service))
            .route("/health", get(health))
            .route("/api/v1/physics/info", get(physics))
            .route("/api/v1/analysis/validate", post(analysis))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock backend should bind");
        let addr = listener.local_addr().expect("bound address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}"),
            shared,
            handle,
        }
    }

    /// Number of requests the route has received.
    pub fn hits(&self, endpoint: Endpoint) -> usize {
        let route = match endpoint {
            Endpoint::Service => &self.shared.service,
            Endpoint::Health => &self.shared.health,
            Endpoint::Physics => &self.shared.physics,
            Endpoint::Analysis => &self.shared.analysis,
        };
        route.hits.load(Ordering::SeqCst)
    }

    /// JSON body of the most recent analysis POST.
    pub fn last_analysis_body(&self) -> Option<Value> {
        self.shared
            .last_analysis_body
            .lock()
            .expect("body lock")
            .clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn service(State(s): State<Arc<Shared>>) -> Response {
    s.service.respond().await
}

async fn health(State(s): State<Arc<Shared>>) -> Response {
    s.health.respond().await
}

async fn physics(State(s): State<Arc<Shared>>) -> Response {
    s.physics.respond().await
}

async fn analysis(State(s): State<Arc<Shared>>, body: String) -> Response {
    *s.last_analysis_body.lock().expect("body lock") = serde_json::from_str(&body).ok();
    s.analysis.respond().await
}

/// A base URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}

pub fn health_json() -> Value {
    json!({
        "status": "healthy",
        "timestamp": "2026-02-14T09:30:00Z",
        "version": "2.3.0",
        "environment": "development",
        "components": {
            "database": { "status": "healthy" },
            "physics_engine": { "status": "active" },
            "ghi": { "status": "active" }
        }
    })
}

pub fn physics_json() -> Value {
    json!({
        "engine": "Physics Truth Engine (PTE)",
        "purpose": "Validate energy conservation and quantify technical losses",
        "parameters": {
            "temperature_celsius": 25.0,
            "min_confidence_threshold": 0.5,
            "strict_mode": false
        }
    })
}

pub fn service_json() -> Value {
    json!({
        "name": "UrjaRakshak",
        "status": "operational",
        "version": "2.3.0",
        "description": "Physics-based grid integrity platform",
        "capabilities": {
            "physics_engine": "active",
            "ghi": "active"
        }
    })
}

pub fn analysis_json() -> Value {
    json!({
        "substation_id": "SS001",
        "analysis": {
            "status": "balanced",
            "energy_balance": {
                "input_mwh": 1000.0,
                "output_mwh": 975.0,
                "expected_loss_mwh": 24.0,
                "actual_loss_mwh": 25.0,
                "residual_mwh": 1.0,
                "residual_percentage": 0.1
            },
            "confidence": {
                "score": 0.92,
                "uncertainty_mwh": 2.5,
                "measurement_quality": "high"
            },
            "component_losses": [
                {
                    "id": "TX001",
                    "type": "transformer",
                    "loss_mwh": 15.2,
                    "loss_percent": 1.52,
                    "method": "I2R"
                },
                {
                    "id": "LN001",
                    "type": "line",
                    "loss_mwh": 8.8,
                    "loss_percent": 0.88,
                    "method": "I2R"
                }
            ]
        },
        "metadata": {
            "engine_version": "2.3.0"
        }
    })
}

//! Dashboard status aggregation.
//!
//! A poll cycle issues `health` and `physics_info` concurrently, waits for
//! both to settle, and merges them into a single [`ViewState`]. The merge is
//! all-or-nothing: any failure yields `Error`, and no partial data is kept.

use std::future::Future;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::api::types::{HealthResponse, PhysicsInfo};
use crate::api::{ApiClient, ApiError};

/// The two read operations the dashboard depends on.
///
/// Implemented by [`ApiClient`]; tests substitute scripted implementations.
pub trait GridApi {
    fn health(&self) -> impl Future<Output = Result<HealthResponse, ApiError>> + Send;
    fn physics_info(&self) -> impl Future<Output = Result<PhysicsInfo, ApiError>> + Send;
}

impl GridApi for ApiClient {
    fn health(&self) -> impl Future<Output = Result<HealthResponse, ApiError>> + Send {
        ApiClient::health(self)
    }

    fn physics_info(&self) -> impl Future<Output = Result<PhysicsInfo, ApiError>> + Send {
        ApiClient::physics_info(self)
    }
}

/// Render-ready dashboard state. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// A poll cycle is in flight.
    Loading,
    /// Both calls succeeded.
    Ready {
        health: HealthResponse,
        physics: PhysicsInfo,
    },
    /// At least one call failed.
    Error { message: String },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Short upper-case label for headers and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Ready { .. } => "READY",
            Self::Error { .. } => "ERROR",
        }
    }
}

/// Merges the outcomes of one poll cycle.
///
/// When both calls fail, the health error is reported and the physics
/// error is dropped, independent of arrival order.
pub fn merge(
    health: Result<HealthResponse, ApiError>,
    physics: Result<PhysicsInfo, ApiError>,
) -> ViewState {
    match (health, physics) {
        (Ok(health), Ok(physics)) => ViewState::Ready { health, physics },
        (Err(e), _) | (Ok(_), Err(e)) => ViewState::Error {
            message: e.to_string(),
        },
    }
}

/// Drives poll cycles against a [`GridApi`] and publishes the state.
///
/// Starts in [`ViewState::Loading`]. Each [`poll`](Self::poll) resets to
/// `Loading` and settles to `Ready` or `Error`; nothing re-polls on its own
/// except [`run`](Self::run) when given an interval.
pub struct StatusPoller<A> {
    api: A,
    state: watch::Sender<ViewState>,
    cycles: u64,
}

impl<A: GridApi> StatusPoller<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            api,
            state,
            cycles: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Number of poll cycles started.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs one poll cycle and returns the settled state.
    ///
    /// Both calls are joined; the cycle settles only after both have
    /// completed, even if one fails early.
    pub async fn poll(&mut self) -> ViewState {
        self.cycles += 1;
        let cycle = self.cycles;
        self.state.send_replace(ViewState::Loading);
        debug!(cycle, "poll cycle started");

        let (health, physics) = tokio::join!(self.api.health(), self.api.physics_info());
        let next = merge(health, physics);

        match &next {
            ViewState::Ready { health, physics } => {
                info!(cycle, status = %health.status, engine = %physics.engine, "poll cycle ready");
            }
            ViewState::Error { message } => warn!(cycle, error = %message, "poll cycle failed"),
            ViewState::Loading => {}
        }

        self.state.send_replace(next.clone());
        next
    }

    /// Polls once, then again on every trigger or interval tick.
    ///
    /// Returns when the trigger channel closes.
    pub async fn run(mut self, mut triggers: mpsc::Receiver<()>, every: Option<Duration>) {
        loop {
            self.poll().await;

            let tick = async {
                match every {
                    Some(interval) => tokio::time::sleep(interval).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                msg = triggers.recv() => {
                    if msg.is_none() {
                        debug!("poll trigger channel closed");
                        break;
                    }
                }
                () = tick => {}
            }
        }
    }
}

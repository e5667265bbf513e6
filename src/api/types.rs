//! Request and response types for the grid backend.
//!
//! Field names follow the backend's JSON contract so the types serialize
//! to exactly what goes over the wire.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Health of a single backend component (database, physics engine, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component status string, e.g. `"healthy"` or `"active"`.
    pub status: String,
}

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status, e.g. `"healthy"` or `"degraded"`.
    pub status: String,
    /// Per-component health, keyed by component name.
    pub components: BTreeMap<String, ComponentHealth>,
    /// Server timestamp (ISO 8601), when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Backend version, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Deployment environment, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Seconds since backend startup, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<u64>,
}

impl HealthResponse {
    /// Returns `true` when the backend reports itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `GET /api/v1/physics/info` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsInfo {
    /// Engine name.
    pub engine: String,
    /// What the engine is for.
    pub purpose: String,
    /// Engine parameters. Values are arbitrary scalars or objects.
    pub parameters: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodology: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub capabilities: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub limitations: BTreeMap<String, String>,
}

/// `GET /` response describing the backend service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capabilities: BTreeMap<String, String>,
}

/// One grid component submitted for analysis.
///
/// Optional fields are omitted from the JSON body when `None`, so the
/// serialized request matches the caller's input exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Component identifier, e.g. `"TX001"`.
    pub component_id: String,
    /// Component kind, e.g. `"transformer"` or `"distribution_line"`.
    pub component_type: String,
    /// Rated capacity (kVA).
    pub rated_capacity_kva: f64,
    /// Efficiency rating (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efficiency_rating: Option<f64>,
    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_years: Option<f64>,
    /// Nominal voltage (kV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_kv: Option<f64>,
    /// Conductor resistance (ohms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistance_ohms: Option<f64>,
    /// Line length (km).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_km: Option<f64>,
    /// Current load divided by rated capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_factor: Option<f64>,
}

impl ComponentSpec {
    /// Creates a component with only the required fields set.
    pub fn new(
        component_id: impl Into<String>,
        component_type: impl Into<String>,
        rated_capacity_kva: f64,
    ) -> Self {
        Self {
            component_id: component_id.into(),
            component_type: component_type.into(),
            rated_capacity_kva,
            efficiency_rating: None,
            age_years: None,
            voltage_kv: None,
            resistance_ohms: None,
            length_km: None,
            load_factor: None,
        }
    }
}

/// `POST /api/v1/analysis/validate` request body.
///
/// No local validation is performed; the backend is the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Substation identifier.
    pub substation_id: String,
    /// Energy entering the section (MWh).
    pub input_energy_mwh: f64,
    /// Energy leaving the section (MWh).
    pub output_energy_mwh: f64,
    /// Components in the section, in submission order.
    pub components: Vec<ComponentSpec>,
    /// Analysis window (hours). The backend assumes 24 when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window_hours: Option<f64>,
}

/// Energy balance classification reported by the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Balanced,
    MinorImbalance,
    SignificantImbalance,
    CriticalImbalance,
    Uncertain,
    Refused,
    /// Any status this client does not recognize.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Balanced => "balanced",
            Self::MinorImbalance => "minor_imbalance",
            Self::SignificantImbalance => "significant_imbalance",
            Self::CriticalImbalance => "critical_imbalance",
            Self::Uncertain => "uncertain",
            Self::Refused => "refused",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Input/output energy and the loss breakdown (MWh).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyBalance {
    pub input_mwh: f64,
    pub output_mwh: f64,
    pub expected_loss_mwh: f64,
    pub actual_loss_mwh: f64,
    /// Actual loss minus expected technical loss.
    pub residual_mwh: f64,
    pub residual_percentage: f64,
}

/// Confidence in the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Confidence {
    /// Score in `[0, 1]`.
    pub score: f64,
    pub uncertainty_mwh: f64,
    pub measurement_quality: String,
}

/// Expected technical loss for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLoss {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub loss_mwh: f64,
    pub loss_percent: f64,
    /// How the loss was computed, e.g. `"I2R"`.
    #[serde(default)]
    pub method: String,
}

/// Physics engine verdict for a grid section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsAnalysis {
    pub status: BalanceStatus,
    #[serde(default)]
    pub energy_balance: EnergyBalance,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub component_losses: Vec<ComponentLoss>,
    /// Set when the engine refused to produce a verdict.
    #[serde(default)]
    pub refusal_reason: Option<String>,
    #[serde(default)]
    pub physical_explanation: Option<String>,
}

/// `POST /api/v1/analysis/validate` success response.
///
/// The backend's reply is not validated. Current backends nest the verdict
/// under `analysis`; older ones report only a flat `balance_status` and
/// `confidence_score`. Every field is optional and anything not modelled
/// here is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub substation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<PhysicsAnalysis>,
    /// Flat verdict, when reported at the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_status: Option<BalanceStatus>,
    /// Flat confidence, when reported at the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AnalysisResult {
    /// Energy balance classification, nested form first.
    pub fn status(&self) -> Option<BalanceStatus> {
        self.analysis
            .as_ref()
            .map(|a| a.status)
            .or(self.balance_status)
    }

    /// Confidence score in `[0, 1]`, nested form first.
    pub fn confidence(&self) -> Option<f64> {
        self.analysis
            .as_ref()
            .map(|a| a.confidence.score)
            .or(self.confidence_score)
    }

    /// Per-component losses; empty when the backend reported none.
    pub fn component_losses(&self) -> &[ComponentLoss] {
        self.analysis
            .as_ref()
            .map(|a| a.component_losses.as_slice())
            .unwrap_or_default()
    }
}

/// Error body returned by the backend on rejected requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

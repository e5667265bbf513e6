//! Loading analysis requests from JSON or TOML files.

use std::fs;
use std::path::Path;

use crate::api::types::AnalysisRequest;
use crate::config::ConfigError;

/// Reads an [`AnalysisRequest`] from `path`.
///
/// Files ending in `.toml` are parsed as TOML (components as
/// `[[components]]` tables); anything else is parsed as JSON.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read or parsed.
pub fn load_analysis_request(path: &Path) -> Result<AnalysisRequest, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError {
        field: "request".to_string(),
        message: format!("cannot read \"{}\": {e}", path.display()),
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&content).map_err(|e| ConfigError {
            field: "request.toml".to_string(),
            message: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError {
            field: "request.json".to_string(),
            message: e.to_string(),
        })
    }
}

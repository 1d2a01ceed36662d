// ABOUTME: Type definitions for the compare API, the client-side configuration and results
// ABOUTME: Wire names follow the JSON contract of POST /api/compare

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// API types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub schema_source: Option<String>,
    #[serde(default)]
    pub schema_target: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// Structured output returned by the model and passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonResult {
    pub changes: Vec<String>,
    pub sql_script: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub status: Option<u16>,
}

// Client-side types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaPair {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportedModel {
    #[default]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl SupportedModel {
    pub const ALL: [SupportedModel; 2] = [SupportedModel::Gpt4o, SupportedModel::Gpt4oMini];

    pub fn id(&self) -> &'static str {
        match self {
            SupportedModel::Gpt4o => "gpt-4o",
            SupportedModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for SupportedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("API key must not be empty")]
    MissingApiKey,
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
}

impl FromStr for SupportedModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SupportedModel::ALL
            .into_iter()
            .find(|model| model.id() == s.trim())
            .ok_or_else(|| ConfigError::UnsupportedModel(s.to_string()))
    }
}

/// Per-user key and model, held by the client and sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: SupportedModel,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>, model: SupportedModel) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self { api_key, model })
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_ids_round_trip() {
        for model in SupportedModel::ALL {
            assert_eq!(model.id().parse::<SupportedModel>().unwrap(), model);
        }
        assert_eq!(
            "gpt-3".parse::<SupportedModel>(),
            Err(ConfigError::UnsupportedModel("gpt-3".to_string()))
        );
        assert_eq!(SupportedModel::default(), SupportedModel::Gpt4o);
    }

    #[test]
    fn test_model_config_requires_key_and_hides_it() {
        assert_eq!(
            ModelConfig::new("   ", SupportedModel::Gpt4o),
            Err(ConfigError::MissingApiKey)
        );

        let config = ModelConfig::new("sk-secret", SupportedModel::Gpt4oMini).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("Gpt4oMini"));
    }

    #[test]
    fn test_compare_request_tolerates_missing_fields() {
        let req: CompareRequest =
            serde_json::from_str(r#"{"schema_source":"a","schema_target":"b","model":null}"#).unwrap();
        assert_eq!(req.schema_source.as_deref(), Some("a"));
        assert!(req.model.is_none());
        assert!(req.openai_key.is_none());
    }

    #[test]
    fn test_comparison_result_rejects_extra_fields() {
        let ok = r#"{"changes":["add table users"],"sql_script":"CREATE TABLE users();"}"#;
        let extra = r#"{"changes":[],"sql_script":"","notes":"hi"}"#;
        let wrong = r#"{"changes":[1,2],"sql_script":""}"#;

        assert!(serde_json::from_str::<ComparisonResult>(ok).is_ok());
        assert!(serde_json::from_str::<ComparisonResult>(extra).is_err());
        assert!(serde_json::from_str::<ComparisonResult>(wrong).is_err());
    }
}

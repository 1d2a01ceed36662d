// ABOUTME: POST /api/compare handler that forwards two schema scripts to the provider
// ABOUTME: Validates input, resolves the model and returns the structured result verbatim

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::Json,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, Result};
use crate::prompt;
use crate::types::{CompareRequest, ComparisonResult};

/// A request that passed validation. Holds the key, so no Debug impl.
pub struct CompareInput {
    pub schema_source: String,
    pub schema_target: String,
    pub model: String,
    pub api_key: String,
}

impl CompareInput {
    pub fn from_request(req: CompareRequest, default_model: Option<&str>) -> Result<Self> {
        let schema_source = required("schema_source", req.schema_source)?;
        let schema_target = required("schema_target", req.schema_target)?;
        let api_key = required("openai_key", req.openai_key)?;

        let model = non_empty(req.model)
            .or_else(|| non_empty(default_model.map(str::to_string)))
            .ok_or_else(|| {
                AppError::BadRequest("model is required and no default model is configured".into())
            })?;

        Ok(Self {
            schema_source,
            schema_target,
            model: model.trim().to_string(),
            api_key,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    non_empty(value).ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

// The body is parsed by hand so that clients which omit the JSON content type
// are still served, and so every rejection carries an `error` field. The route
// has no body limit; schema dumps are routinely larger than axum's default.
pub async fn compare(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<ComparisonResult>> {
    let body = body.map_err(|err| {
        AppError::BadRequest(format!("Invalid request body: {}", err.body_text()))
    })?;
    let req: CompareRequest = serde_json::from_slice(&body)
        .map_err(|err| AppError::BadRequest(format!("Invalid request body: {}", err)))?;
    let input = CompareInput::from_request(req, state.default_model.as_deref())?;

    let span = tracing::info_span!("compare", request_id = %Uuid::new_v4(), model = %input.model);
    async move {
        let started = Instant::now();
        tracing::info!(
            source_len = input.schema_source.len(),
            target_len = input.schema_target.len(),
            "comparing schemas"
        );

        let prompt_text = prompt::build_prompt(&input.schema_source, &input.schema_target);
        let result = state
            .provider
            .complete(&input.model, &input.api_key, &prompt_text)
            .await?;

        tracing::info!(
            changes = result.changes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "comparison completed"
        );
        Ok::<_, AppError>(Json(result))
    }
    .instrument(span)
    .await
}

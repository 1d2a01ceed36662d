// ABOUTME: Client for an OpenAI-compatible chat completions API with structured output
// ABOUTME: Validates the returned content against the comparison result shape

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::ProviderError;
use crate::prompt;
use crate::types::ComparisonResult;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const USER_AGENT: &str = concat!("comparedb/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Shared handle on the completion provider. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Provider {
    client: Client,
    base_url: String,
}

impl Provider {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one prompt and returns the validated structured result.
    /// No retries: the first failure is returned to the caller.
    pub async fn complete(
        &self,
        model: &str,
        api_key: &str,
        prompt_text: &str,
    ) -> Result<ComparisonResult, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt_text,
            }],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: prompt::RESULT_SCHEMA_NAME,
                    strict: true,
                    schema: prompt::result_schema(),
                },
            },
        };

        tracing::debug!(%url, model, "sending completion request");
        let res = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(classify_failure(status, &text, model));
        }

        parse_completion(&text)
    }
}

fn classify_failure(status: StatusCode, body: &str, model: &str) -> ProviderError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_default();
    let message = redact_keys(&detail.message.unwrap_or_else(|| body.to_string()));

    let model_not_found = detail.code.as_deref() == Some("model_not_found");

    match status {
        // The upstream message echoes the submitted key, so only the code is kept
        StatusCode::UNAUTHORIZED => ProviderError::InvalidCredential(
            detail.code.unwrap_or_else(|| "unauthorized".to_string()),
        ),
        StatusCode::NOT_FOUND => ProviderError::InvalidModel(model.to_string()),
        _ if model_not_found => ProviderError::InvalidModel(model.to_string()),
        _ => ProviderError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

/// Masks anything shaped like an API key (`sk-...`) in provider text.
fn redact_keys(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let trimmed = word.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
            if trimmed.starts_with("sk-") {
                let prefix = &word[..word.len() - trimmed.len()];
                format!("{}sk-<redacted>", prefix)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the first choice and checks it against the result schema.
pub fn parse_completion(body: &str) -> Result<ComparisonResult, ProviderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::MalformedOutput(format!("completion envelope: {}", err)))?;

    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| ProviderError::MalformedOutput("no choices returned".to_string()))?;

    if let Some(refusal) = message.refusal {
        return Err(ProviderError::MalformedOutput(format!("model refused: {}", refusal)));
    }

    let content = message
        .content
        .ok_or_else(|| ProviderError::MalformedOutput("empty message content".to_string()))?;

    serde_json::from_str::<ComparisonResult>(&content)
        .map_err(|err| ProviderError::MalformedOutput(err.to_string()))
}

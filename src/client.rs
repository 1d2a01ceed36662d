// ABOUTME: HTTP client for the compare API used by the command-line front end
// ABOUTME: Takes the user's model configuration explicitly on every call

use reqwest::Client;

use crate::types::{CompareRequest, ComparisonResult, ErrorResponse, ModelConfig, SchemaPair};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("both schema scripts are required before comparing")]
    MissingSchema,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Clone, Debug)]
pub struct CompareClient {
    client: Client,
    endpoint: String,
}

impl CompareClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/compare", server_url.trim_end_matches('/')),
        }
    }

    pub async fn compare(
        &self,
        schemas: &SchemaPair,
        config: &ModelConfig,
    ) -> Result<ComparisonResult, ClientError> {
        let body = CompareRequest {
            schema_source: Some(schemas.source.clone()),
            schema_target: Some(schemas.target.clone()),
            model: Some(config.model.id().to_string()),
            openai_key: Some(config.api_key.clone()),
        };

        let res = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|err| err.error)
                .unwrap_or(text);
            tracing::debug!(status = status.as_u16(), %message, "compare request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(res.json::<ComparisonResult>().await?)
    }
}

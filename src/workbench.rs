// ABOUTME: Client-side state for the two schema panes and the last comparison result
// ABOUTME: Any edit to either pane drops the result, and compare needs both panes filled

use crate::client::{ClientError, CompareClient};
use crate::types::{ComparisonResult, ModelConfig, Pane, SchemaPair};

#[derive(Debug, Default)]
pub struct Workbench {
    schemas: SchemaPair,
    result: Option<ComparisonResult>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schemas(&self) -> &SchemaPair {
        &self.schemas
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    /// Text of one pane, for copying out.
    pub fn text(&self, pane: Pane) -> &str {
        match pane {
            Pane::Source => &self.schemas.source,
            Pane::Target => &self.schemas.target,
        }
    }

    pub fn set_schema(&mut self, pane: Pane, text: impl Into<String>) {
        *self.pane_mut(pane) = text.into();
        self.result = None;
    }

    pub fn clear(&mut self, pane: Pane) {
        self.pane_mut(pane).clear();
        self.result = None;
    }

    pub fn can_compare(&self) -> bool {
        !self.schemas.source.trim().is_empty() && !self.schemas.target.trim().is_empty()
    }

    pub async fn compare(
        &mut self,
        client: &CompareClient,
        config: &ModelConfig,
    ) -> Result<&ComparisonResult, ClientError> {
        if !self.can_compare() {
            return Err(ClientError::MissingSchema);
        }

        self.result = None;
        let result = client.compare(&self.schemas, config).await?;
        Ok(self.result.insert(result))
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut String {
        match pane {
            Pane::Source => &mut self.schemas.source,
            Pane::Target => &mut self.schemas.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SupportedModel;

    const RESULT_BODY: &str = r#"{"changes":["Add table orders"],"sql_script":"CREATE TABLE orders (id int);"}"#;

    fn filled() -> Workbench {
        let mut bench = Workbench::new();
        bench.set_schema(Pane::Source, "CREATE TABLE users (id int);");
        bench.set_schema(Pane::Target, "CREATE TABLE users (id int);\nCREATE TABLE orders (id int);");
        bench
    }

    fn config() -> ModelConfig {
        ModelConfig::new("sk-test", SupportedModel::Gpt4o).unwrap()
    }

    #[test]
    fn test_compare_disabled_until_both_panes_filled() {
        let mut bench = Workbench::new();
        assert!(!bench.can_compare());

        bench.set_schema(Pane::Source, "CREATE TABLE a (id int);");
        assert!(!bench.can_compare());

        bench.set_schema(Pane::Target, "   \n");
        assert!(!bench.can_compare());

        bench.set_schema(Pane::Target, "CREATE TABLE b (id int);");
        assert!(bench.can_compare());

        bench.clear(Pane::Source);
        assert!(!bench.can_compare());
    }

    #[test]
    fn test_clear_and_copy_are_per_pane() {
        let mut bench = filled();
        let target = bench.text(Pane::Target).to_string();

        assert_eq!(bench.text(Pane::Source), "CREATE TABLE users (id int);");
        bench.clear(Pane::Source);

        assert_eq!(bench.text(Pane::Source), "");
        assert_eq!(bench.text(Pane::Target), target);

        bench.set_schema(Pane::Source, "CREATE TABLE x (id int);");
        bench.clear(Pane::Target);
        assert_eq!(bench.text(Pane::Source), "CREATE TABLE x (id int);");
        assert_eq!(bench.text(Pane::Target), "");
    }

    #[tokio::test]
    async fn test_compare_refuses_empty_pane_without_network() {
        let mut bench = Workbench::new();
        bench.set_schema(Pane::Source, "CREATE TABLE a (id int);");

        // Unroutable on purpose: the call must fail before any request is made
        let client = CompareClient::new("http://127.0.0.1:1");
        let err = bench.compare(&client, &config()).await.unwrap_err();

        assert!(matches!(err, ClientError::MissingSchema));
    }

    #[tokio::test]
    async fn test_editing_either_pane_clears_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/compare")
            .with_status(200)
            .with_body(RESULT_BODY)
            .create_async()
            .await;
        let client = CompareClient::new(&server.url());

        for pane in [Pane::Source, Pane::Target] {
            let mut bench = filled();
            bench.compare(&client, &config()).await.unwrap();
            assert!(bench.result().is_some());

            bench.set_schema(pane, "CREATE TABLE changed (id int);");
            assert!(bench.result().is_none());
        }

        let mut bench = filled();
        bench.compare(&client, &config()).await.unwrap();
        bench.clear(Pane::Target);
        assert!(bench.result().is_none());
    }

    #[tokio::test]
    async fn test_failed_compare_then_retry_succeeds() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", "/api/compare")
            .with_status(500)
            .with_body(r#"{"error":"Internal server error","status":500}"#)
            .create_async()
            .await;
        let client = CompareClient::new(&server.url());
        let mut bench = filled();

        assert!(bench.compare(&client, &config()).await.is_err());
        assert!(bench.result().is_none());

        failing.remove_async().await;
        let _ok = server
            .mock("POST", "/api/compare")
            .with_status(200)
            .with_body(RESULT_BODY)
            .create_async()
            .await;

        let result = bench.compare(&client, &config()).await.unwrap();
        assert_eq!(result.sql_script, "CREATE TABLE orders (id int);");
        assert_eq!(bench.result().map(|r| r.changes.len()), Some(1));
    }
}

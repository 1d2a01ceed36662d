// ABOUTME: Fixed prompt template for schema comparison and the structured output schema
// ABOUTME: Interpolates the two schema scripts after a static instruction block

use serde_json::{Value, json};

pub const INSTRUCTIONS: &str = include_str!("../prompts/compare_instructions.txt");

/// Name reported to the provider for the structured output format.
pub const RESULT_SCHEMA_NAME: &str = "schema_comparison";

pub fn build_prompt(schema_source: &str, schema_target: &str) -> String {
    format!(
        "{}\nschema_source: {}\nschema_target: {}\n",
        INSTRUCTIONS.trim_end(),
        schema_source,
        schema_target
    )
}

/// JSON Schema the model output must conform to. Kept in step with
/// `types::ComparisonResult`.
pub fn result_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "changes": {
                "type": "array",
                "items": { "type": "string" }
            },
            "sql_script": { "type": "string" }
        },
        "required": ["changes", "sql_script"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_places_schemas_after_instructions() {
        let prompt = build_prompt("CREATE TABLE a (id int);", "CREATE TABLE b (id int);");

        assert!(prompt.starts_with(INSTRUCTIONS.trim_end()));
        let source_at = prompt.find("schema_source: CREATE TABLE a (id int);").unwrap();
        let target_at = prompt.find("schema_target: CREATE TABLE b (id int);").unwrap();
        assert!(source_at > INSTRUCTIONS.trim_end().len() - 1);
        assert!(source_at < target_at);
    }

    #[test]
    fn test_prompt_keeps_multiline_schemas_intact() {
        let source = "CREATE TABLE a (\n  id int\n);";
        let prompt = build_prompt(source, "");
        assert!(prompt.contains(source));
    }

    #[test]
    fn test_result_schema_is_strict() {
        let schema = result_schema();
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["changes", "sql_script"]));
        assert_eq!(schema["properties"]["changes"]["items"]["type"], "string");
    }
}

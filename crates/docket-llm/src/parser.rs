//! Parse service output into field records

use crate::LlmError;
use docket_domain::{FieldSet, FieldValue, Record};
use serde_json::{Map, Value};
use tracing::debug;

/// Parse a JSON object response into a record keyed by the requested fields
///
/// Every requested field appears in the output in FieldSet order; fields the
/// response does not mention are `Null`. An empty response (or `{}`) yields an
/// all-null record rather than an error. Keys the caller did not ask for are
/// dropped.
pub fn parse_record(response: &str, fields: &FieldSet) -> Result<Record, LlmError> {
    let json_str = extract_json(response)?;

    let object = if json_str.is_empty() {
        Map::new()
    } else {
        let json: Value = serde_json::from_str(&json_str)
            .map_err(|e| LlmError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        match json {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(LlmError::InvalidResponse(format!(
                    "Expected JSON object, got {}",
                    json_kind(&other)
                )))
            }
        }
    };

    let mut record = Record::new();
    for field in fields.iter() {
        let value = lookup(&object, field).map(to_field_value).unwrap_or(FieldValue::Null);
        record.insert(field, value);
    }

    let unrequested = object.keys().filter(|k| !fields.contains(k)).count();
    if unrequested > 0 {
        debug!("Dropped {} unrequested keys from response", unrequested);
    }

    Ok(record)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, LlmError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(LlmError::InvalidResponse("Empty code block".to_string()));
        }

        // Skip the opening fence line and a closing fence if present
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n").trim().to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Exact key first, then a case-insensitive match
fn lookup<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).or_else(|| {
        let folded = field.to_lowercase();
        object
            .iter()
            .find(|(k, _)| k.to_lowercase() == folded)
            .map(|(_, v)| v)
    })
}

fn to_field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Number(n) => n
            .as_f64()
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::Text(n.to_string())),
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        Value::Array(_) | Value::Object(_) => FieldValue::Text(value.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FieldSet {
        FieldSet::from_names(["Customer", "Job No", "Grand Total"])
    }

    #[test]
    fn test_parse_valid_object() {
        let response = r#"{"Customer": "Acme", "Job No": "J1", "Grand Total": 100}"#;
        let record = parse_record(response, &fields()).unwrap();

        assert_eq!(record.text("Customer").as_deref(), Some("Acme"));
        assert_eq!(record.text("Job No").as_deref(), Some("J1"));
        assert_eq!(record.get("Grand Total"), Some(&FieldValue::Number(100.0)));
    }

    #[test]
    fn test_output_follows_field_order() {
        let response = r#"{"Grand Total": "1", "Customer": "Acme"}"#;
        let record = parse_record(response, &fields()).unwrap();

        let keys: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Customer", "Job No", "Grand Total"]);
    }

    #[test]
    fn test_missing_fields_become_null() {
        let record = parse_record(r#"{"Customer": "Acme"}"#, &fields()).unwrap();
        assert!(record.get("Job No").unwrap().is_null());
        assert!(record.get("Grand Total").unwrap().is_null());
    }

    #[test]
    fn test_empty_response_is_all_null() {
        for response in ["", "   ", "{}", "null"] {
            let record = parse_record(response, &fields()).unwrap();
            assert_eq!(record.len(), 3);
            assert!(record.iter().all(|(_, v)| v.is_null()));
        }
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"Customer\": \"Acme\"}\n```";
        let record = parse_record(response, &fields()).unwrap();
        assert_eq!(record.text("Customer").as_deref(), Some("Acme"));
    }

    #[test]
    fn test_case_insensitive_keys() {
        let record = parse_record(r#"{"customer": "Acme", "JOB NO": "J9"}"#, &fields()).unwrap();
        assert_eq!(record.text("Customer").as_deref(), Some("Acme"));
        assert_eq!(record.text("Job No").as_deref(), Some("J9"));
    }

    #[test]
    fn test_exact_key_wins_over_folded() {
        let record = parse_record(r#"{"customer": "lower", "Customer": "exact"}"#, &fields()).unwrap();
        assert_eq!(record.text("Customer").as_deref(), Some("exact"));
    }

    #[test]
    fn test_non_scalar_values_become_text() {
        let record = parse_record(r#"{"Customer": ["A", "B"], "Job No": true}"#, &fields()).unwrap();
        assert_eq!(record.text("Customer").as_deref(), Some(r#"["A","B"]"#));
        assert_eq!(record.text("Job No").as_deref(), Some("true"));
    }

    #[test]
    fn test_unrequested_keys_dropped() {
        let record = parse_record(r#"{"Customer": "Acme", "Extra": "x"}"#, &fields()).unwrap();
        assert!(!record.contains("Extra"));
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_record("This is not JSON", &fields());
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[test]
    fn test_non_object_json() {
        let result = parse_record("[1, 2, 3]", &fields());
        assert!(matches!(result, Err(LlmError::InvalidResponse(ref m)) if m.contains("array")));
    }
}

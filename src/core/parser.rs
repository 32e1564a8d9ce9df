use crate::domain::model::FacilityRecord;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// Decodes one input object into facility records.
///
/// Primary format is a single JSON array; when that fails to parse, the
/// content is retried as JSON-Lines, one record per line, skipping lines
/// that do not decode. The precedence is fixed: whole-array first, lines
/// second, with no content sniffing in between.
pub fn parse_facilities(content: &[u8], key: &str) -> Result<Vec<FacilityRecord>> {
    match serde_json::from_slice::<Value>(content) {
        Ok(Value::Array(items)) => {
            let total = items.len();
            let facilities = collect_records(items, key);
            tracing::info!(
                "Successfully parsed JSON array with {} facilities from {}",
                facilities.len(),
                key
            );
            if facilities.len() < total {
                tracing::warn!(
                    "Dropped {} non-object entries from {}",
                    total - facilities.len(),
                    key
                );
            }
            Ok(facilities)
        }
        Ok(other) => Err(EtlError::ProcessingError {
            message: format!(
                "Top-level JSON in {} is {}, expected an array of facility records",
                key,
                json_type_name(&other)
            ),
        }),
        Err(_) => {
            tracing::info!("JSON array parsing failed for {}, trying JSON Lines format", key);
            Ok(parse_json_lines(content, key))
        }
    }
}

fn collect_records(items: Vec<Value>, key: &str) -> Vec<FacilityRecord> {
    let mut facilities = Vec::new();
    for item in items {
        match item {
            Value::Object(fields) => facilities.push(FacilityRecord::new(fields)),
            other => {
                tracing::error!(
                    "Skipping non-object facility entry ({}) in {}",
                    json_type_name(&other),
                    key
                );
            }
        }
    }
    facilities
}

fn parse_json_lines(content: &[u8], key: &str) -> Vec<FacilityRecord> {
    let text = String::from_utf8_lossy(content);
    let mut facilities = Vec::new();

    for (line_num, line) in text.trim().split('\n').enumerate() {
        let line_num = line_num + 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(fields)) => facilities.push(FacilityRecord::new(fields)),
            Ok(other) => {
                tracing::warn!(
                    "Skipping non-object JSON on line {} of {}: {}",
                    line_num,
                    key,
                    json_type_name(&other)
                );
            }
            Err(e) => {
                tracing::warn!("Skipping invalid JSON on line {} of {}: {}", line_num, key, e);
            }
        }
    }

    tracing::info!(
        "Successfully parsed JSON Lines with {} facilities from {}",
        facilities.len(),
        key
    );
    facilities
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

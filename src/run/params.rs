//! Statement parameter parsing.
//!
//! Parameters arrive as textual JSON: an ordered array of values for
//! positional markers, or a name-to-value object for named markers. Parsing
//! happens at most once per work item, and only when binding is enabled.

use crate::error::{BridgeError, Result};
use serde_json::Value;

/// Parses the parameter JSON for one work item.
///
/// Returns `None` when binding is disabled or no text is supplied. Malformed
/// JSON, or valid JSON that is neither an array nor an object, is a
/// statement-level error for the item.
pub fn parse_parameters(use_parameters: bool, parameters_json: Option<&str>) -> Result<Option<Value>> {
    if !use_parameters {
        return Ok(None);
    }
    let Some(text) = parameters_json else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| BridgeError::parameters(format!("cannot parse parameter JSON: {e}")))?;

    match value {
        Value::Array(_) | Value::Object(_) => Ok(Some(value)),
        other => Err(BridgeError::parameters(format!(
            "expected a JSON array or object, got {}",
            json_type_name(&other)
        ))),
    }
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

//! Parsing of the raw JSON argument strings providers send with tool calls.
//!
//! ```rust
//! use ftooling::{parse_arguments, parse_json_object};
//! use serde_json::json;
//!
//! let args = parse_json_object(r#"{"arg0":37,"arg1":87}"#).expect("object should parse");
//! assert_eq!(args.get("arg1"), Some(&json!(87)));
//!
//! assert_eq!(parse_arguments("   ").expect("blank means no arguments"), json!({}));
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

/// Parses a provider argument string. A blank string stands for an empty
/// argument object, which some providers send for parameterless tools.
pub fn parse_arguments(raw_arguments: &str) -> Result<Value, ToolError> {
    if raw_arguments.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(raw_arguments)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(raw_arguments: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_arguments(raw_arguments)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object_keeps_values() {
        let args = parse_json_object("{\"query\":\"rust\"}").expect("args should parse");
        assert_eq!(args.get("query").and_then(Value::as_str), Some("rust"));
    }

    #[test]
    fn parse_invalid_json_returns_invalid_arguments() {
        let error = parse_arguments("{").expect_err("json should fail");
        assert_eq!(error.kind, crate::ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn non_object_arguments_are_rejected_by_object_parser() {
        let error = parse_json_object("[1,2]").expect_err("array is not an object");
        assert_eq!(error.kind, crate::ToolErrorKind::InvalidArguments);
    }
}

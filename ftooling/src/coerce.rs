//! Coercion of model-supplied argument values against a tool's parameter schema.
//!
//! The coercer walks the untyped argument value alongside the schema node it
//! should match, normalizes what it can (whole floats into integers, numeric
//! strings when the policy allows) and reports the first mismatch with the
//! argument path where it occurred.
//!
//! ```rust
//! use fschema::{Definitions, ObjectSchema, SchemaNode};
//! use ftooling::{ArgumentCoercer, NumericStringPolicy};
//! use serde_json::json;
//!
//! let root = ObjectSchema::builder()
//!     .property("arg0", SchemaNode::integer())
//!     .required(["arg0"])
//!     .build();
//! let definitions = Definitions::new();
//! let coercer = ArgumentCoercer::new(&definitions, NumericStringPolicy::Reject);
//!
//! let coerced = coercer.coerce_arguments(&root, &json!({ "arg0": 37.0 })).expect("whole number");
//! assert_eq!(coerced.get("arg0"), Some(&json!(37)));
//!
//! let error = coercer.coerce_arguments(&root, &json!({ "arg0": 3.5 })).expect_err("fraction");
//! assert_eq!(error.path.as_deref(), Some("arg0"));
//! ```

use fschema::{Definitions, ObjectSchema, SchemaNode};
use serde_json::{Map, Number, Value};

use crate::{NumericStringPolicy, ToolError};

const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;
const U64_UPPER: f64 = 18_446_744_073_709_551_616.0;

#[derive(Debug, Clone, Copy)]
pub struct ArgumentCoercer<'a> {
    definitions: &'a Definitions,
    numeric_strings: NumericStringPolicy,
}

impl<'a> ArgumentCoercer<'a> {
    pub fn new(definitions: &'a Definitions, numeric_strings: NumericStringPolicy) -> Self {
        Self {
            definitions,
            numeric_strings,
        }
    }

    /// Coerces the top-level argument object. Paths of top-level arguments are
    /// the bare property names (`arg0`, `city`).
    pub fn coerce_arguments(
        &self,
        root: &ObjectSchema,
        arguments: &Value,
    ) -> Result<Map<String, Value>, ToolError> {
        match arguments {
            Value::Object(map) => self.coerce_fields(root, map, None),
            Value::Null => self.coerce_fields(root, &Map::new(), None),
            other => Err(ToolError::invalid_arguments(format!(
                "expected a JSON object of named arguments, got {}",
                kind_of(other)
            ))),
        }
    }

    pub fn coerce(&self, node: &SchemaNode, value: &Value, path: &str) -> Result<Value, ToolError> {
        match node {
            SchemaNode::Integer { .. } => self.coerce_integer(value, path),
            SchemaNode::Number { .. } => self.coerce_number(value, path),
            SchemaNode::Boolean { .. } => match value {
                Value::Bool(_) => Ok(value.clone()),
                other => Err(mismatch("boolean", other, path)),
            },
            SchemaNode::String { .. } => match value {
                Value::String(_) => Ok(value.clone()),
                other => Err(mismatch("string", other, path)),
            },
            SchemaNode::Enum { values, .. } => match value {
                Value::String(text) if values.iter().any(|allowed| allowed == text) => {
                    Ok(value.clone())
                }
                Value::String(text) => Err(ToolError::invalid_arguments(format!(
                    "'{text}' is not one of [{}]",
                    values.join(", ")
                ))
                .with_path(path)),
                other => Err(mismatch("enum string", other, path)),
            },
            SchemaNode::Array { items, .. } => match value {
                Value::Array(elements) => elements
                    .iter()
                    .enumerate()
                    .map(|(index, element)| self.coerce(items, element, &format!("{path}[{index}]")))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(mismatch("array", other, path)),
            },
            SchemaNode::Object(object) => self.coerce_object(object, value, path),
            SchemaNode::Reference { id } => {
                let object = self.definitions.get(id).ok_or_else(|| {
                    ToolError::invalid_arguments(format!("schema reference '{id}' is not defined"))
                        .with_path(path)
                })?;
                self.coerce_object(object, value, path)
            }
        }
    }

    fn coerce_object(
        &self,
        object: &ObjectSchema,
        value: &Value,
        path: &str,
    ) -> Result<Value, ToolError> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(mismatch("object", other, path)),
        };

        if object.is_opaque() {
            return Ok(value.clone());
        }

        self.coerce_fields(object, map, Some(path)).map(Value::Object)
    }

    /// Declared properties only; undeclared fields are dropped and absent or
    /// null optional fields are left out.
    fn coerce_fields(
        &self,
        object: &ObjectSchema,
        map: &Map<String, Value>,
        parent: Option<&str>,
    ) -> Result<Map<String, Value>, ToolError> {
        let mut coerced = Map::new();

        for (name, node) in object.properties() {
            let path = match parent {
                Some(parent) => format!("{parent}.{name}"),
                None => name.to_string(),
            };

            match map.get(name) {
                None | Some(Value::Null) => {
                    if object.is_required(name) {
                        return Err(ToolError::invalid_arguments(format!(
                            "missing required field '{name}'"
                        ))
                        .with_path(path));
                    }
                }
                Some(value) => {
                    coerced.insert(name.to_string(), self.coerce(node, value, &path)?);
                }
            }
        }

        Ok(coerced)
    }

    fn coerce_integer(&self, value: &Value, path: &str) -> Result<Value, ToolError> {
        let number = match value {
            Value::Number(number) => number.clone(),
            Value::String(text) if self.numeric_strings == NumericStringPolicy::Parse => {
                parse_number(text).ok_or_else(|| mismatch("integer", value, path))?
            }
            other => return Err(mismatch("integer", other, path)),
        };

        if number.is_i64() || number.is_u64() {
            return Ok(Value::Number(number));
        }

        let float = number.as_f64().unwrap_or(f64::NAN);
        if !float.is_finite() || float.trunc() != float {
            return Err(ToolError::invalid_arguments(format!(
                "expected integer, got fractional number {number}"
            ))
            .with_path(path));
        }

        if (-I64_UPPER..I64_UPPER).contains(&float) {
            Ok(Value::from(float as i64))
        } else if (0.0..U64_UPPER).contains(&float) {
            Ok(Value::from(float as u64))
        } else {
            Err(ToolError::invalid_arguments(format!("integer {number} is out of range")).with_path(path))
        }
    }

    fn coerce_number(&self, value: &Value, path: &str) -> Result<Value, ToolError> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(text) if self.numeric_strings == NumericStringPolicy::Parse => parse_number(text)
                .map(Value::Number)
                .ok_or_else(|| mismatch("number", value, path)),
            other => Err(mismatch("number", other, path)),
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Number::from(integer));
    }
    if let Ok(integer) = text.parse::<u64>() {
        return Some(Number::from(integer));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn mismatch(expected: &str, actual: &Value, path: &str) -> ToolError {
    ToolError::invalid_arguments(format!("expected {expected}, got {}", kind_of(actual))).with_path(path)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

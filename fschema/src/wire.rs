//! Canonical JSON wire form of schema documents.
//!
//! Objects carry `type`, ordered `properties` and an ordered `required`
//! list; recursive types live under a top-level `$defs` table and are
//! referenced as `#/$defs/<id>`.
//!
//! ```rust
//! use fschema::{ObjectSchema, SchemaDocument, SchemaNode};
//! use serde_json::json;
//!
//! let document = SchemaDocument::new(
//!     ObjectSchema::builder()
//!         .property("arg0", SchemaNode::enumeration(["RED", "GREEN"]))
//!         .required(["arg0"])
//!         .build(),
//!     Default::default(),
//! )
//! .expect("no references");
//!
//! let wire = document.to_json();
//! assert_eq!(
//!     wire,
//!     json!({
//!         "type": "object",
//!         "properties": { "arg0": { "type": "string", "enum": ["RED", "GREEN"] } },
//!         "required": ["arg0"]
//!     })
//! );
//! assert_eq!(SchemaDocument::from_json(&wire).expect("parses"), document);
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::{Definitions, ObjectSchema, SchemaDocument, SchemaError, SchemaNode};

pub const DEFS_POINTER_PREFIX: &str = "#/$defs/";

impl SchemaNode {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Object(object) => object.to_json(),
            Self::Array { items, description } => {
                with_description(json!({ "type": "array", "items": items.to_json() }), description)
            }
            Self::String { description } => with_description(json!({ "type": "string" }), description),
            Self::Integer { description } => {
                with_description(json!({ "type": "integer" }), description)
            }
            Self::Number { description } => with_description(json!({ "type": "number" }), description),
            Self::Boolean { description } => {
                with_description(json!({ "type": "boolean" }), description)
            }
            Self::Enum {
                values,
                description,
            } => with_description(json!({ "type": "string", "enum": values }), description),
            Self::Reference { id } => json!({ "$ref": format!("{DEFS_POINTER_PREFIX}{id}") }),
        }
    }

    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let map = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid_document("schema node must be a JSON object"))?;

        if let Some(pointer) = map.get("$ref") {
            let pointer = pointer
                .as_str()
                .ok_or_else(|| SchemaError::invalid_document("$ref must be a string"))?;
            let id = pointer.strip_prefix(DEFS_POINTER_PREFIX).ok_or_else(|| {
                SchemaError::invalid_document(format!(
                    "$ref '{pointer}' does not point into {DEFS_POINTER_PREFIX}"
                ))
            })?;
            return Ok(Self::reference(id));
        }

        let description = optional_string(map, "description")?;

        if let Some(values) = map.get("enum") {
            let values = string_list(values, "enum")?;
            return Ok(Self::Enum {
                values,
                description,
            });
        }

        let node = match map.get("type").and_then(Value::as_str) {
            Some("object") => return ObjectSchema::from_json(value).map(Self::Object),
            Some("array") => {
                let items = map
                    .get("items")
                    .ok_or_else(|| SchemaError::invalid_document("array schema requires items"))?;
                Self::Array {
                    items: Box::new(Self::from_json(items)?),
                    description,
                }
            }
            Some("string") => Self::String { description },
            Some("integer") => Self::Integer { description },
            Some("number") => Self::Number { description },
            Some("boolean") => Self::Boolean { description },
            Some(other) => {
                return Err(SchemaError::invalid_document(format!(
                    "unknown schema type '{other}'"
                )));
            }
            None => return Err(SchemaError::invalid_document("schema node is missing 'type'")),
        };

        Ok(node)
    }
}

impl ObjectSchema {
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::from("object"));
        if let Some(description) = self.description() {
            map.insert("description".to_string(), Value::from(description));
        }
        if !self.is_empty() {
            let properties: Map<String, Value> = self
                .properties()
                .map(|(name, node)| (name.to_string(), node.to_json()))
                .collect();
            map.insert("properties".to_string(), Value::Object(properties));
        }
        if !self.required().is_empty() {
            map.insert("required".to_string(), json!(self.required()));
        }
        Value::Object(map)
    }

    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let map = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid_document("object schema must be a JSON object"))?;

        match map.get("type").and_then(Value::as_str) {
            Some("object") => {}
            _ => {
                return Err(SchemaError::invalid_document(
                    "expected a schema with \"type\": \"object\"",
                ));
            }
        }

        let mut builder = ObjectSchema::builder();
        if let Some(properties) = map.get("properties") {
            let properties = properties
                .as_object()
                .ok_or_else(|| SchemaError::invalid_document("properties must be an object"))?;
            for (name, node) in properties {
                let node = SchemaNode::from_json(node).map_err(|error| error.with_path(name))?;
                builder = builder.property(name.clone(), node);
            }
        }
        if let Some(required) = map.get("required") {
            builder = builder.required(string_list(required, "required")?);
        }
        if let Some(description) = optional_string(map, "description")? {
            builder = builder.description(description);
        }

        Ok(builder.build())
    }
}

impl SchemaDocument {
    pub fn to_json(&self) -> Value {
        let mut root = self.root().to_json();
        if !self.definitions().is_empty() {
            let defs: Map<String, Value> = self
                .definitions()
                .iter()
                .map(|(id, schema)| (id.to_string(), schema.to_json()))
                .collect();
            if let Value::Object(map) = &mut root {
                map.insert("$defs".to_string(), Value::Object(defs));
            }
        }
        root
    }

    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let root = ObjectSchema::from_json(value)?;
        let mut definitions = Definitions::new();

        if let Some(defs) = value.get("$defs") {
            let defs = defs
                .as_object()
                .ok_or_else(|| SchemaError::invalid_document("$defs must be an object"))?;
            for (id, schema) in defs {
                let schema = ObjectSchema::from_json(schema).map_err(|error| error.with_path(id))?;
                definitions.define(id.clone(), schema);
            }
        }

        SchemaDocument::new(root, definitions)
    }
}

impl Serialize for SchemaDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchemaDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        SchemaDocument::from_json(&value).map_err(D::Error::custom)
    }
}

fn with_description(mut value: Value, description: &Option<String>) -> Value {
    if let (Value::Object(map), Some(description)) = (&mut value, description) {
        map.insert("description".to_string(), Value::from(description.as_str()));
    }
    value
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(SchemaError::invalid_document(format!("{key} must be a string"))),
    }
}

fn string_list(value: &Value, key: &str) -> Result<Vec<String>, SchemaError> {
    let items = value
        .as_array()
        .ok_or_else(|| SchemaError::invalid_document(format!("{key} must be an array")))?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(ToString::to_string).ok_or_else(|| {
                SchemaError::invalid_document(format!("{key} entries must be strings"))
            })
        })
        .collect()
}

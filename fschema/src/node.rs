//! Language-neutral schema nodes and the shared definitions table.
//!
//! ```rust
//! use fschema::{ObjectSchema, SchemaNode};
//!
//! let person = ObjectSchema::builder()
//!     .property("name", SchemaNode::string())
//!     .property("age", SchemaNode::integer())
//!     .required(["name", "age"])
//!     .build();
//!
//! assert_eq!(person.property("age"), Some(&SchemaNode::integer()));
//! assert!(person.is_required("name"));
//! ```

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Object(ObjectSchema),
    Array {
        items: Box<SchemaNode>,
        description: Option<String>,
    },
    String {
        description: Option<String>,
    },
    Integer {
        description: Option<String>,
    },
    Number {
        description: Option<String>,
    },
    Boolean {
        description: Option<String>,
    },
    Enum {
        values: Vec<String>,
        description: Option<String>,
    },
    Reference {
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Enum,
    Reference,
}

impl SchemaNode {
    pub fn string() -> Self {
        Self::String { description: None }
    }

    pub fn integer() -> Self {
        Self::Integer { description: None }
    }

    pub fn number() -> Self {
        Self::Number { description: None }
    }

    pub fn boolean() -> Self {
        Self::Boolean { description: None }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::Array {
            items: Box::new(items),
            description: None,
        }
    }

    pub fn reference(id: impl Into<String>) -> Self {
        Self::Reference { id: id.into() }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Object(_) => SchemaKind::Object,
            Self::Array { .. } => SchemaKind::Array,
            Self::String { .. } => SchemaKind::String,
            Self::Integer { .. } => SchemaKind::Integer,
            Self::Number { .. } => SchemaKind::Number,
            Self::Boolean { .. } => SchemaKind::Boolean,
            Self::Enum { .. } => SchemaKind::Enum,
            Self::Reference { .. } => SchemaKind::Reference,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Object(object) => object.description(),
            Self::Array { description, .. }
            | Self::String { description }
            | Self::Integer { description }
            | Self::Number { description }
            | Self::Boolean { description }
            | Self::Enum { description, .. } => description.as_deref(),
            Self::Reference { .. } => None,
        }
    }

    /// Attaches a description. References carry none, so the call is a no-op for them.
    /// Replaces any description already on the node, so a parameter or field
    /// description wins over a record's own. References carry none.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Object(object) => object.description = Some(text.into()),
            Self::Array { description, .. }
            | Self::String { description }
            | Self::Integer { description }
            | Self::Number { description }
            | Self::Boolean { description }
            | Self::Enum { description, .. } => *description = Some(text.into()),
            Self::Reference { .. } => {}
        }
        self
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Visits every reference id in this subtree.
    pub fn for_each_reference<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        match self {
            Self::Object(object) => object.for_each_reference(visit),
            Self::Array { items, .. } => items.for_each_reference(visit),
            Self::Reference { id } => visit(id.as_str()),
            _ => {}
        }
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(value: ObjectSchema) -> Self {
        Self::Object(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectSchema {
    properties: Vec<(String, SchemaNode)>,
    required: Vec<String>,
    description: Option<String>,
}

impl ObjectSchema {
    pub fn builder() -> ObjectSchemaBuilder {
        ObjectSchemaBuilder::default()
    }

    /// An object without declared properties: any mapping is acceptable.
    pub fn opaque() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.properties
            .iter()
            .map(|(name, node)| (name.as_str(), node))
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, node)| node)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|candidate| candidate == name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_opaque(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn for_each_reference<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        for (_, node) in &self.properties {
            node.for_each_reference(visit);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectSchemaBuilder {
    properties: Vec<(String, SchemaNode)>,
    required: Vec<String>,
    description: Option<String>,
}

impl ObjectSchemaBuilder {
    /// Adds a property; a repeated name replaces the earlier node in place.
    pub fn property(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        let name = name.into();
        let node = node.into();
        match self
            .properties
            .iter_mut()
            .find(|(candidate, _)| *candidate == name)
        {
            Some((_, existing)) => *existing = node,
            None => self.properties.push((name, node)),
        }
        self
    }

    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.required.contains(&name) {
                self.required.push(name);
            }
        }
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> ObjectSchema {
        ObjectSchema {
            properties: self.properties,
            required: self.required,
            description: self.description,
        }
    }
}

/// Named object schemas shared by every reference in one schema document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Definitions {
    entries: BTreeMap<String, ObjectSchema>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `id` unless the id is already defined.
    /// Returns whether the entry was added.
    pub fn define(&mut self, id: impl Into<String>, schema: ObjectSchema) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, schema);
        true
    }

    pub fn get(&self, id: &str) -> Option<&ObjectSchema> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectSchema)> {
        self.entries
            .iter()
            .map(|(id, schema)| (id.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order_and_deduplicates_required() {
        let schema = ObjectSchema::builder()
            .property("zeta", SchemaNode::string())
            .property("alpha", SchemaNode::boolean())
            .required(["zeta", "alpha", "zeta"])
            .build();

        let names: Vec<&str> = schema.property_names().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(schema.required(), ["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn repeated_property_replaces_node_without_moving_it() {
        let schema = ObjectSchema::builder()
            .property("a", SchemaNode::string())
            .property("b", SchemaNode::string())
            .property("a", SchemaNode::integer())
            .build();

        let names: Vec<&str> = schema.property_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.property("a"), Some(&SchemaNode::integer()));
    }

    #[test]
    fn description_is_ignored_for_references() {
        let node = SchemaNode::reference("abc").with_description("ignored");
        assert_eq!(node, SchemaNode::reference("abc"));
        assert_eq!(node.description(), None);

        let described = SchemaNode::number().with_description("height in meters");
        assert_eq!(described.description(), Some("height in meters"));
        assert_eq!(described.kind(), SchemaKind::Number);
    }

    #[test]
    fn definitions_register_each_id_once() {
        let mut definitions = Definitions::new();
        let first = ObjectSchema::builder()
            .property("name", SchemaNode::string())
            .build();

        assert!(definitions.define("person", first.clone()));
        assert!(!definitions.define("person", ObjectSchema::opaque()));
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions.get("person"), Some(&first));
    }

    #[test]
    fn reference_visitor_walks_nested_arrays() {
        let schema = ObjectSchema::builder()
            .property(
                "children",
                SchemaNode::array(SchemaNode::reference("person")),
            )
            .property("name", SchemaNode::string())
            .build();

        let mut seen = Vec::new();
        schema.for_each_reference(&mut |id| seen.push(id.to_string()));
        assert_eq!(seen, vec!["person".to_string()]);
    }
}

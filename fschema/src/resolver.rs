//! Walks type descriptors into schema nodes, turning recursion into `$defs` references.
//!
//! ```rust
//! use fschema::{Describe, RecordDescriptor, SchemaNode, TypeDescriptor, TypeResolver, definition_id};
//!
//! struct Person;
//!
//! impl Describe for Person {
//!     fn describe() -> TypeDescriptor {
//!         RecordDescriptor::new("family::Person")
//!             .field::<String>("name")
//!             .field::<Vec<Person>>("children")
//!             .into()
//!     }
//! }
//!
//! let mut resolver = TypeResolver::new();
//! let node = resolver.resolve(&Person::describe(), "arg0").expect("person resolves");
//! let definitions = resolver.into_definitions();
//!
//! let id = definition_id("family::Person");
//! let person = node.as_object().expect("person is an object");
//! assert_eq!(
//!     person.property("children"),
//!     Some(&SchemaNode::array(SchemaNode::reference(id.clone())))
//! );
//! assert_eq!(definitions.get(&id), Some(person));
//! ```

use std::collections::{HashMap, HashSet};

use crate::{
    Definitions, ObjectSchema, RecordDescriptor, SchemaError, SchemaNode, TypeDescriptor,
    definition_id,
};

/// Resolution state for one schema document.
#[derive(Debug, Default)]
pub struct TypeResolver {
    in_progress: HashSet<String>,
    referenced: HashSet<String>,
    ids: HashMap<String, String>,
    definitions: Definitions,
}

/// A resolved slot: the node plus whether the declared type made it optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSlot {
    pub node: SchemaNode,
    pub required: bool,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a field or parameter slot. An outer `Optional` makes the slot
    /// not required; any nested optionality collapses into the inner node.
    pub fn resolve_slot(
        &mut self,
        descriptor: &TypeDescriptor,
        path: &str,
    ) -> Result<ResolvedSlot, SchemaError> {
        match descriptor {
            TypeDescriptor::Optional(inner) => Ok(ResolvedSlot {
                node: self.resolve(&inner(), path)?,
                required: false,
            }),
            other => Ok(ResolvedSlot {
                node: self.resolve(other, path)?,
                required: true,
            }),
        }
    }

    pub fn resolve(
        &mut self,
        descriptor: &TypeDescriptor,
        path: &str,
    ) -> Result<SchemaNode, SchemaError> {
        match descriptor {
            TypeDescriptor::Integer => Ok(SchemaNode::integer()),
            TypeDescriptor::Number => Ok(SchemaNode::number()),
            TypeDescriptor::Boolean => Ok(SchemaNode::boolean()),
            TypeDescriptor::String => Ok(SchemaNode::string()),
            TypeDescriptor::Enum(values) => Ok(SchemaNode::enumeration(values.iter().cloned())),
            TypeDescriptor::Sequence(items) => {
                let items = self.resolve(&items(), &format!("{path}[]"))?;
                Ok(SchemaNode::array(items))
            }
            TypeDescriptor::Mapping => Ok(SchemaNode::Object(ObjectSchema::opaque())),
            TypeDescriptor::Optional(inner) => self.resolve(&inner(), path),
            TypeDescriptor::Record(record) => self.resolve_record(record, path),
            TypeDescriptor::Unsupported(type_name) => {
                Err(SchemaError::unsupported_type(path, type_name))
            }
        }
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn into_definitions(self) -> Definitions {
        self.definitions
    }

    fn resolve_record(
        &mut self,
        record: &RecordDescriptor,
        path: &str,
    ) -> Result<SchemaNode, SchemaError> {
        let id = self.id_for(&record.type_name);
        if self.in_progress.contains(&id) {
            self.referenced.insert(id.clone());
            return Ok(SchemaNode::reference(id));
        }

        self.in_progress.insert(id.clone());
        let resolved = self.resolve_fields(record, path);
        self.in_progress.remove(&id);
        let object = resolved?;

        if self.referenced.contains(&id) {
            self.definitions.define(id, object.clone());
        }

        Ok(SchemaNode::Object(object))
    }

    fn resolve_fields(
        &mut self,
        record: &RecordDescriptor,
        path: &str,
    ) -> Result<ObjectSchema, SchemaError> {
        let mut builder = ObjectSchema::builder();
        let mut required = Vec::new();

        for field in &record.fields {
            let field_path = format!("{path}.{}", field.name);
            let slot = self.resolve_slot(&(field.ty)(), &field_path)?;
            let node = match &field.description {
                Some(description) => slot.node.with_description(description.clone()),
                None => slot.node,
            };

            if slot.required {
                required.push(field.name.clone());
            }
            builder = builder.property(field.name.clone(), node);
        }

        builder = builder.required(required);
        if let Some(description) = &record.description {
            builder = builder.description(description.clone());
        }

        Ok(builder.build())
    }

    fn id_for(&mut self, type_name: &str) -> String {
        self.ids
            .entry(type_name.to_string())
            .or_insert_with(|| definition_id(type_name))
            .clone()
    }
}

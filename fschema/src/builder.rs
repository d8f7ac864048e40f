//! Assembles the parameter schema of one tool into an immutable document.
//!
//! ```rust
//! use fschema::{ParameterDescriptor, SchemaBuilder, SchemaNode};
//!
//! let document = SchemaBuilder::new()
//!     .parameter(ParameterDescriptor::of::<i32>())
//!     .parameter(ParameterDescriptor::of::<i32>())
//!     .build()
//!     .expect("integers are supported")
//!     .expect("two parameters produce a document");
//!
//! let names: Vec<&str> = document.root().property_names().collect();
//! assert_eq!(names, vec!["arg0", "arg1"]);
//! assert_eq!(document.root().property("arg1"), Some(&SchemaNode::integer()));
//!
//! assert!(SchemaBuilder::new().build().expect("no parameters").is_none());
//! ```

use std::collections::HashSet;

use crate::{Definitions, Describe, ObjectSchema, SchemaError, TypeRef, TypeResolver};

/// A parameter schema plus the definitions its references point into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    root: ObjectSchema,
    definitions: Definitions,
}

impl SchemaDocument {
    /// Fails with a dangling-reference error when any `$ref` in the root or in
    /// the definitions themselves has no matching entry.
    pub fn new(root: ObjectSchema, definitions: Definitions) -> Result<Self, SchemaError> {
        let document = Self { root, definitions };
        document.validate_references()?;
        Ok(document)
    }

    pub fn root(&self) -> &ObjectSchema {
        &self.root
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn resolve_reference(&self, id: &str) -> Option<&ObjectSchema> {
        self.definitions.get(id)
    }

    fn validate_references(&self) -> Result<(), SchemaError> {
        let mut dangling = None;
        let mut check = |id: &str| {
            if dangling.is_none() && !self.definitions.contains(id) {
                dangling = Some(id.to_string());
            }
        };

        self.root.for_each_reference(&mut check);
        for (_, schema) in self.definitions.iter() {
            schema.for_each_reference(&mut check);
        }

        match dangling {
            Some(id) => Err(SchemaError::dangling_reference(&id)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub name: Option<String>,
    pub description: Option<String>,
    pub ty: TypeRef,
}

impl ParameterDescriptor {
    pub fn new(ty: TypeRef) -> Self {
        Self {
            name: None,
            description: None,
            ty,
        }
    }

    pub fn of<T>() -> Self
    where
        T: Describe + ?Sized,
    {
        Self::new(T::describe)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The declared name, or `arg{position}` when none was given.
    pub fn property_name(&self, position: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("arg{position}"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    parameters: Vec<ParameterDescriptor>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: impl IntoIterator<Item = ParameterDescriptor>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Property names in positional order, as the built document will expose them.
    pub fn property_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .enumerate()
            .map(|(position, parameter)| parameter.property_name(position))
            .collect()
    }

    /// Returns `None` for a tool without parameters; otherwise a document whose
    /// root object holds one property per parameter.
    pub fn build(self) -> Result<Option<SchemaDocument>, SchemaError> {
        if self.parameters.is_empty() {
            return Ok(None);
        }

        let mut resolver = TypeResolver::new();
        let mut seen = HashSet::new();
        let mut root = ObjectSchema::builder();
        let mut required = Vec::new();

        for (position, parameter) in self.parameters.iter().enumerate() {
            let name = parameter.property_name(position);
            if !seen.insert(name.clone()) {
                return Err(SchemaError::duplicate_parameter(&name));
            }

            let slot = resolver.resolve_slot(&(parameter.ty)(), &name)?;
            let node = match &parameter.description {
                Some(description) => slot.node.with_description(description.clone()),
                None => slot.node,
            };

            if slot.required {
                required.push(name.clone());
            }
            root = root.property(name, node);
        }

        let root = root.required(required).build();
        SchemaDocument::new(root, resolver.into_definitions()).map(Some)
    }
}

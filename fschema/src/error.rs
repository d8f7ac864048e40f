//! Schema derivation and parsing errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// A type that has no schema representation, such as an untyped value.
    UnsupportedType,
    /// A `$ref` whose id is missing from the definitions table.
    DanglingReference,
    /// Two parameters of one tool resolved to the same property name.
    DuplicateParameter,
    /// A wire-form document that does not describe a schema.
    InvalidDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
    pub path: Option<String>,
}

impl SchemaError {
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
        }
    }

    pub fn unsupported_type(path: impl Into<String>, type_name: &str) -> Self {
        let path = path.into();
        Self::new(
            SchemaErrorKind::UnsupportedType,
            format!("type '{type_name}' at '{path}' cannot be described by a schema"),
        )
        .with_path(path)
    }

    pub fn dangling_reference(id: &str) -> Self {
        Self::new(
            SchemaErrorKind::DanglingReference,
            format!("reference '{id}' is not present in $defs"),
        )
    }

    pub fn duplicate_parameter(name: &str) -> Self {
        Self::new(
            SchemaErrorKind::DuplicateParameter,
            format!("parameter name '{name}' is declared more than once"),
        )
        .with_path(name)
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::InvalidDocument, message)
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{:?} [path={}]: {}", self.kind, path, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for SchemaError {}

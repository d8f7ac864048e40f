//! Declarative type descriptors supplied by tool parameter types.
//!
//! Types opt into schema derivation by implementing [`Describe`]. Record
//! fields hold [`TypeRef`] thunks rather than descriptors, so a record may
//! mention itself (directly or through another record) without the
//! description recursing forever.
//!
//! ```rust
//! use fschema::{Describe, RecordDescriptor, TypeDescriptor};
//!
//! struct Person {
//!     name: String,
//!     children: Vec<Person>,
//! }
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
//! assert!(matches!(Person::describe(), TypeDescriptor::Record(_)));
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Lazily produces the descriptor of a type.
pub type TypeRef = fn() -> TypeDescriptor;

#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Integer,
    Number,
    Boolean,
    String,
    Enum(Vec<String>),
    Record(RecordDescriptor),
    Sequence(TypeRef),
    /// Key/value mapping whose key set is not enumerable.
    Mapping,
    Optional(TypeRef),
    /// A type without a schema representation, named for error reporting.
    Unsupported(String),
}

impl TypeDescriptor {
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported(type_name.into())
    }
}

impl From<RecordDescriptor> for TypeDescriptor {
    fn from(value: RecordDescriptor) -> Self {
        Self::Record(value)
    }
}

#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    pub type_name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    /// `type_name` must be fully qualified; it is the identity used for
    /// cycle detection and for the `$defs` id.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field<T>(self, name: impl Into<String>) -> Self
    where
        T: Describe + ?Sized,
    {
        self.with_field(FieldDescriptor::new(name, T::describe))
    }

    pub fn described_field<T>(self, name: impl Into<String>, description: impl Into<String>) -> Self
    where
        T: Describe + ?Sized,
    {
        self.with_field(FieldDescriptor::new(name, T::describe).with_description(description))
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
        }
    }

    pub fn of<T>(name: impl Into<String>) -> Self
    where
        T: Describe + ?Sized,
    {
        Self::new(name, T::describe)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub trait Describe {
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_as {
    ($kind:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::$kind
                }
            }
        )+
    };
}

describe_as!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_as!(Number => f32, f64);
describe_as!(Boolean => bool);
describe_as!(String => String, str, char);

impl Describe for Cow<'_, str> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::String
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Optional(T::describe)
    }
}

macro_rules! describe_sequence {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::Sequence(T::describe)
                }
            }
        )+
    };
}

describe_sequence!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Sequence(T::describe)
    }
}

impl<K, V, S> Describe for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Mapping
    }
}

impl<K, V> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Mapping
    }
}

impl Describe for serde_json::Map<String, serde_json::Value> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Mapping
    }
}

impl Describe for serde_json::Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::unsupported("serde_json::Value")
    }
}

macro_rules! describe_transparent {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn describe() -> TypeDescriptor {
                    T::describe()
                }
            }
        )+
    };
}

describe_transparent!(Box, Rc, Arc);

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_name(descriptor: &TypeDescriptor) -> &'static str {
        match descriptor {
            TypeDescriptor::Integer => "integer",
            TypeDescriptor::Number => "number",
            TypeDescriptor::Boolean => "boolean",
            TypeDescriptor::String => "string",
            TypeDescriptor::Enum(_) => "enum",
            TypeDescriptor::Record(_) => "record",
            TypeDescriptor::Sequence(_) => "sequence",
            TypeDescriptor::Mapping => "mapping",
            TypeDescriptor::Optional(_) => "optional",
            TypeDescriptor::Unsupported(_) => "unsupported",
        }
    }

    #[test]
    fn std_types_map_to_expected_categories() {
        assert_eq!(kind_name(&u8::describe()), "integer");
        assert_eq!(kind_name(&i64::describe()), "integer");
        assert_eq!(kind_name(&f32::describe()), "number");
        assert_eq!(kind_name(&bool::describe()), "boolean");
        assert_eq!(kind_name(&String::describe()), "string");
        assert_eq!(kind_name(&<str>::describe()), "string");
        assert_eq!(kind_name(&<HashSet<u32>>::describe()), "sequence");
        assert_eq!(kind_name(&<[bool; 3]>::describe()), "sequence");
        assert_eq!(kind_name(&<HashMap<String, i32>>::describe()), "mapping");
        assert_eq!(kind_name(&Option::<String>::describe()), "optional");
        assert_eq!(kind_name(&Box::<f64>::describe()), "number");
        assert_eq!(kind_name(&serde_json::Value::describe()), "unsupported");
    }

    #[test]
    fn sequence_thunk_yields_element_descriptor() {
        let TypeDescriptor::Sequence(items) = Vec::<Option<u16>>::describe() else {
            panic!("vec should describe a sequence");
        };
        let TypeDescriptor::Optional(inner) = items() else {
            panic!("element should be optional");
        };
        assert_eq!(kind_name(&inner()), "integer");
    }

    #[test]
    fn record_builder_keeps_field_order_and_descriptions() {
        let record = RecordDescriptor::new("shop::Item")
            .with_description("a catalog item")
            .field::<String>("sku")
            .described_field::<f64>("price", "unit price in EUR");

        let names: Vec<&str> = record.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["sku", "price"]);
        assert_eq!(record.fields[1].description.as_deref(), Some("unit price in EUR"));
        assert_eq!(record.description.as_deref(), Some("a catalog item"));
    }
}

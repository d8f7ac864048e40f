//! Schema derivation for tool parameters.
//!
//! Parameter types describe themselves through [`Describe`]; the
//! [`TypeResolver`] walks those descriptors into [`SchemaNode`] trees and the
//! [`SchemaBuilder`] freezes a tool's parameters into a [`SchemaDocument`].
//!
//! ```rust
//! use fschema::{Describe, ParameterDescriptor, RecordDescriptor, SchemaBuilder, TypeDescriptor};
//! use serde_json::json;
//!
//! struct Address;
//!
//! impl Describe for Address {
//!     fn describe() -> TypeDescriptor {
//!         RecordDescriptor::new("shop::Address").field::<String>("city").into()
//!     }
//! }
//!
//! let document = SchemaBuilder::new()
//!     .parameter(ParameterDescriptor::of::<Address>())
//!     .build()
//!     .expect("address is supported")
//!     .expect("one parameter");
//!
//! assert_eq!(
//!     document.to_json(),
//!     json!({
//!         "type": "object",
//!         "properties": {
//!             "arg0": {
//!                 "type": "object",
//!                 "properties": { "city": { "type": "string" } },
//!                 "required": ["city"]
//!             }
//!         },
//!         "required": ["arg0"]
//!     })
//! );
//! ```

mod builder;
mod descriptor;
mod error;
mod id;
mod node;
mod resolver;
mod wire;

pub mod prelude {
    pub use crate::{
        Definitions, Describe, ObjectSchema, ParameterDescriptor, RecordDescriptor,
        SchemaBuilder, SchemaDocument, SchemaError, SchemaErrorKind, SchemaNode, TypeDescriptor,
    };
}

pub use builder::{ParameterDescriptor, SchemaBuilder, SchemaDocument};
pub use descriptor::{Describe, FieldDescriptor, RecordDescriptor, TypeDescriptor, TypeRef};
pub use error::{SchemaError, SchemaErrorKind};
pub use id::definition_id;
pub use node::{Definitions, ObjectSchema, ObjectSchemaBuilder, SchemaKind, SchemaNode};
pub use resolver::{ResolvedSlot, TypeResolver};
pub use wire::DEFS_POINTER_PREFIX;

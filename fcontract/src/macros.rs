/// Implements [`Describe`](crate::Describe) for a record type from a field list.
///
/// The type identity defaults to `module_path!()::Type`; `as "path::Type"`
/// pins it explicitly. A record description follows a colon, field
/// descriptions follow `=>`. `Option<T>` fields are optional.
///
/// ```rust
/// use fcontract::{ParameterDescriptor, SchemaBuilder, describe_record};
/// use serde_json::json;
///
/// struct Ancestor;
///
/// describe_record!(Ancestor as "family::Ancestor" {
///     name: String => "given name",
///     children: Vec<Ancestor>,
/// });
///
/// let document = SchemaBuilder::new()
///     .parameter(ParameterDescriptor::of::<Ancestor>())
///     .build()
///     .expect("ancestor is supported")
///     .expect("one parameter");
///
/// assert_eq!(document.definitions().len(), 1);
/// assert_eq!(document.root().required(), ["arg0".to_string()]);
/// ```
#[macro_export]
macro_rules! describe_record {
    (@impl $ty:ident, $name:expr, [$($description:literal)?], {
        $($field:ident : $field_ty:ty $(=> $field_doc:literal)?),* $(,)?
    }) => {
        impl $crate::fschema::Describe for $ty {
            fn describe() -> $crate::fschema::TypeDescriptor {
                #[allow(unused_mut)]
                let mut record = $crate::fschema::RecordDescriptor::new($name);
                $(record = record.with_description($description);)?
                $(
                    record = record.with_field({
                        let field = $crate::fschema::FieldDescriptor::of::<$field_ty>(stringify!($field));
                        $(let field = field.with_description($field_doc);)?
                        field
                    });
                )*
                record.into()
            }
        }
    };
    ($ty:ident as $name:literal $(: $description:literal)? { $($fields:tt)* }) => {
        $crate::describe_record!(@impl $ty, $name, [$($description)?], { $($fields)* });
    };
    ($ty:ident $(: $description:literal)? { $($fields:tt)* }) => {
        $crate::describe_record!(
            @impl $ty,
            concat!(module_path!(), "::", stringify!($ty)),
            [$($description)?],
            { $($fields)* }
        );
    };
}

/// Implements [`Describe`](crate::Describe) for an enumerated type. Values are
/// either variant identifiers (used as written) or string literals matching
/// the serialized names.
///
/// ```rust
/// use fcontract::{ParameterDescriptor, SchemaBuilder, SchemaNode, describe_enum};
///
/// enum Unit {}
/// describe_enum!(Unit { "celsius", "fahrenheit" });
///
/// let document = SchemaBuilder::new()
///     .parameter(ParameterDescriptor::of::<Unit>())
///     .build()
///     .expect("enums are supported")
///     .expect("one parameter");
///
/// assert_eq!(
///     document.root().property("arg0"),
///     Some(&SchemaNode::enumeration(["celsius", "fahrenheit"]))
/// );
/// ```
#[macro_export]
macro_rules! describe_enum {
    ($ty:ident { $($value:literal),+ $(,)? }) => {
        impl $crate::fschema::Describe for $ty {
            fn describe() -> $crate::fschema::TypeDescriptor {
                $crate::fschema::TypeDescriptor::enumeration([$($value),+])
            }
        }
    };
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::fschema::Describe for $ty {
            fn describe() -> $crate::fschema::TypeDescriptor {
                $crate::fschema::TypeDescriptor::enumeration([$(stringify!($variant)),+])
            }
        }
    };
}

/// Builds an [`InvocationRequest`](crate::InvocationRequest) from a call id, a
/// tool name and JSON argument syntax.
///
/// ```rust
/// use fcontract::tool_call;
///
/// let request = tool_call!("call_1", "weather", { "city": "Oslo", "days": 3 });
/// assert_eq!(request.tool_name, "weather");
/// assert_eq!(request.arguments["days"], 3);
/// ```
#[macro_export]
macro_rules! tool_call {
    ($call_id:expr, $tool_name:expr $(,)?) => {
        $crate::InvocationRequest::new($call_id, $tool_name, $crate::serde_json::json!({}))
    };
    ($call_id:expr, $tool_name:expr, $($arguments:tt)+) => {
        $crate::InvocationRequest::new($call_id, $tool_name, $crate::serde_json::json!($($arguments)+))
    };
}

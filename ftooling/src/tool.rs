//! Tool descriptors, executable handles and the staged tool builder.
//!
//! ```rust
//! use ftooling::FunctionTool;
//! use serde_json::json;
//!
//! fn add(left: i32, right: i32) -> Result<i32, String> {
//!     Ok(left + right)
//! }
//!
//! let tool = FunctionTool::from_fn("add", add)
//!     .with_description("Adds two integers")
//!     .with_parameter_description(1, "second addend")
//!     .build()
//!     .expect("tool should build");
//!
//! assert_eq!(
//!     tool.descriptor().to_json(),
//!     json!({
//!         "name": "add",
//!         "description": "Adds two integers",
//!         "parameters": {
//!             "type": "object",
//!             "properties": {
//!                 "arg0": { "type": "integer" },
//!                 "arg1": { "type": "integer", "description": "second addend" }
//!             },
//!             "required": ["arg0", "arg1"]
//!         }
//!     })
//! );
//! ```

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use fcommon::BoxFuture;
use fschema::{ParameterDescriptor, SchemaBuilder, SchemaDocument};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::handler::{AsyncFnHandler, SyncFnHandler};
use crate::{
    ArgumentCoercer, AsyncToolFn, NumericStringPolicy, Parameters, SyncToolFn, ToolError,
    ToolExecutionContext,
};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

/// Coerced arguments in parameter order, each paired with its property name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToolArguments {
    entries: Vec<(String, Value)>,
}

impl ToolArguments {
    pub fn new(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn positional(&self, position: usize) -> Option<&Value> {
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Decodes one named argument; an absent argument decodes from `null`.
    pub fn decode<T>(&self, name: &str) -> Result<T, ToolError>
    where
        T: DeserializeOwned,
    {
        let value = self.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|error| {
            ToolError::invalid_arguments(format!("argument could not be decoded: {error}"))
                .with_path(name)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}

/// Object-safe executable behind every registered tool.
pub trait ToolHandler: Send + Sync {
    fn call<'a>(
        &'a self,
        arguments: ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// Absent when the tool takes no arguments.
    pub parameters: Option<SchemaDocument>,
}

impl ToolDescriptor {
    /// The `{name, description?, parameters?}` definition handed to the model.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::from(self.name.as_str()));
        if let Some(description) = &self.description {
            map.insert("description".to_string(), Value::from(description.as_str()));
        }
        if let Some(parameters) = &self.parameters {
            map.insert("parameters".to_string(), parameters.to_json());
        }
        Value::Object(map)
    }
}

impl Serialize for ToolDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

/// The handler plus the property names needed to rebuild a positional call.
#[derive(Clone)]
pub struct ToolHandle {
    parameter_names: Vec<String>,
    handler: Arc<dyn ToolHandler>,
}

impl ToolHandle {
    pub fn new(parameter_names: Vec<String>, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            parameter_names,
            handler,
        }
    }

    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Lays named values out in parameter order. Missing names become `null`.
    pub fn bind(&self, mut named: Map<String, Value>) -> ToolArguments {
        ToolArguments::new(
            self.parameter_names
                .iter()
                .map(|name| {
                    let value = named.remove(name).unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect(),
        )
    }

    pub fn call<'a>(
        &'a self,
        arguments: ToolArguments,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        self.handler.call(arguments, context)
    }
}

impl Debug for ToolHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolHandle")
            .field("parameter_names", &self.parameter_names)
            .finish_non_exhaustive()
    }
}

/// A built tool: immutable descriptor plus executable handle.
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    handle: ToolHandle,
}

impl RegisteredTool {
    pub fn new(descriptor: ToolDescriptor, handle: ToolHandle) -> Self {
        Self { descriptor, handle }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn handle(&self) -> &ToolHandle {
        &self.handle
    }

    /// Coerces raw model arguments against this tool's schema and lays them out
    /// for the handle.
    pub fn bind_arguments(
        &self,
        raw_arguments: &Value,
        numeric_strings: NumericStringPolicy,
    ) -> Result<ToolArguments, ToolError> {
        match &self.descriptor.parameters {
            None => match raw_arguments {
                Value::Null | Value::Object(_) => Ok(ToolArguments::default()),
                _ => Err(ToolError::invalid_arguments(
                    "expected a JSON object of named arguments",
                )),
            },
            Some(document) => {
                let coercer = ArgumentCoercer::new(document.definitions(), numeric_strings);
                let named = coercer.coerce_arguments(document.root(), raw_arguments)?;
                Ok(self.handle.bind(named))
            }
        }
    }
}

/// Staged builder for one tool. The parameter list comes from the handler;
/// names and descriptions can be overridden per position before `build`.
pub struct FunctionTool {
    name: String,
    description: Option<String>,
    parameters: Vec<ParameterDescriptor>,
    handler: Arc<dyn ToolHandler>,
    names: BTreeMap<usize, String>,
    descriptions: BTreeMap<usize, String>,
}

impl FunctionTool {
    /// A tool backed by a custom handler with an explicit parameter list.
    pub fn new<H>(
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = ParameterDescriptor>,
        handler: H,
    ) -> Self
    where
        H: ToolHandler + 'static,
    {
        Self::with_handler(name.into(), parameters.into_iter().collect(), Arc::new(handler))
    }

    pub fn from_fn<F, Args>(name: impl Into<String>, function: F) -> Self
    where
        F: SyncToolFn<Args>,
        Args: Parameters,
    {
        Self::with_handler(
            name.into(),
            Args::descriptors(),
            Arc::new(SyncFnHandler::new(function)),
        )
    }

    pub fn from_async_fn<F, Args>(name: impl Into<String>, function: F) -> Self
    where
        F: AsyncToolFn<Args>,
        Args: Parameters,
    {
        Self::with_handler(
            name.into(),
            Args::descriptors(),
            Arc::new(AsyncFnHandler::new(function)),
        )
    }

    fn with_handler(
        name: String,
        parameters: Vec<ParameterDescriptor>,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name,
            description: None,
            parameters,
            handler,
            names: BTreeMap::new(),
            descriptions: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter_name(mut self, position: usize, name: impl Into<String>) -> Self {
        self.names.insert(position, name.into());
        self
    }

    pub fn with_parameter_description(
        mut self,
        position: usize,
        description: impl Into<String>,
    ) -> Self {
        self.descriptions.insert(position, description.into());
        self
    }

    /// Derives the parameter schema. Fails for this tool only when a parameter
    /// type cannot be mapped or an override names a missing position.
    pub fn build(self) -> Result<RegisteredTool, ToolError> {
        let Self {
            name,
            description,
            mut parameters,
            handler,
            names,
            descriptions,
        } = self;

        let arity = parameters.len();
        let overrides = names.keys().chain(descriptions.keys());
        if let Some(position) = overrides.copied().find(|position| *position >= arity) {
            return Err(ToolError::unsupported_type(format!(
                "parameter override at position {position} but the tool takes {arity} parameters"
            ))
            .with_tool_name(name));
        }

        for (position, parameter_name) in names {
            parameters[position].name = Some(parameter_name);
        }
        for (position, parameter_description) in descriptions {
            parameters[position].description = Some(parameter_description);
        }

        let builder = SchemaBuilder::new().parameters(parameters);
        let parameter_names = builder.property_names();
        let schema = builder
            .build()
            .map_err(|error| ToolError::from(error).with_tool_name(name.clone()))?;

        Ok(RegisteredTool::new(
            ToolDescriptor {
                name,
                description,
                parameters: schema,
            },
            ToolHandle::new(parameter_names, handler),
        ))
    }
}

impl Debug for FunctionTool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arity", &self.parameters.len())
            .finish_non_exhaustive()
    }
}

/// Several tools sharing one receiver.
///
/// ```rust
/// use std::sync::Arc;
///
/// use ftooling::{FunctionTool, ToolRegistryBuilder, ToolSet};
///
/// struct Thermostat {
///     offset: f64,
/// }
///
/// impl ToolSet for Thermostat {
///     fn tools(self: Arc<Self>) -> Vec<FunctionTool> {
///         let receiver = Arc::clone(&self);
///         vec![
///             FunctionTool::from_fn("adjusted", move |reading: f64| {
///                 Ok::<_, String>(reading + receiver.offset)
///             }),
///             FunctionTool::from_fn("offset", move || Ok::<_, String>(self.offset)),
///         ]
///     }
/// }
///
/// let mut builder = ToolRegistryBuilder::new();
/// builder.register_set(Thermostat { offset: 0.5 }).expect("tools are unique");
/// assert_eq!(builder.build().len(), 2);
/// ```
pub trait ToolSet: Send + Sync + 'static {
    fn tools(self: Arc<Self>) -> Vec<FunctionTool>;
}

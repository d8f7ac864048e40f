//! Unified facade over the fcontract workspace crates.
//!
//! This crate is meant to be the single dependency for applications that
//! expose tools to a language model: it re-exports schema derivation, the
//! tool registry, the dispatcher and the observability hooks, and adds
//! declarative macros for describing parameter types.
//!
//! ```rust
//! use fcontract::prelude::*;
//! use serde_json::json;
//!
//! fn add(left: i32, right: i32) -> Result<i32, String> {
//!     Ok(left + right)
//! }
//!
//! let dispatcher = build_dispatcher([tool("add", add)]).expect("add registers");
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .expect("runtime should build");
//!
//! let result = runtime.block_on(dispatcher.dispatch(
//!     tool_call!("call_1", "add", { "arg0": 37, "arg1": 87 }),
//!     &context("session-1"),
//! ));
//! assert_eq!(result.return_value, json!(124));
//! ```

mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use fcommon;
pub use fobserve;
pub use fschema;
pub use ftooling;
pub use serde_json;

pub use fcommon::{BoxFuture, MetadataMap, SessionId, TraceId};
pub use fobserve::{MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
pub use fschema::{
    DEFS_POINTER_PREFIX, Definitions, Describe, FieldDescriptor, ObjectSchema,
    ParameterDescriptor, RecordDescriptor, SchemaBuilder, SchemaDocument, SchemaError,
    SchemaErrorKind, SchemaKind, SchemaNode, TypeDescriptor, definition_id,
};
pub use ftooling::{
    ArgumentCoercer, AsyncToolFn, DispatchMode, DispatchPolicy, Dispatcher, FunctionTool,
    InvocationRequest, InvocationResult, NoopToolRuntimeHooks, NumericStringPolicy, Parameters,
    RegisteredTool, SyncToolFn, ToolArguments, ToolDescriptor, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolFuture, ToolHandle, ToolHandler, ToolRegistry, ToolRegistryBuilder,
    ToolRuntime, ToolRuntimeHooks, ToolSet, parse_arguments, parse_json_object,
};

pub use runtime::{
    build_dispatcher, build_dispatcher_with, build_registry, metered_dispatcher,
    observed_dispatcher,
};
pub use util::{async_tool, context, request, tool};

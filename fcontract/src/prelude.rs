//! Common imports for most fcontract applications.

pub use crate::{async_tool, context, request, tool};
pub use crate::{
    build_dispatcher, build_dispatcher_with, build_registry, metered_dispatcher,
    observed_dispatcher,
};
pub use crate::{describe_enum, describe_record, tool_call};
pub use crate::{
    Describe, DispatchPolicy, Dispatcher, FieldDescriptor, FunctionTool, InvocationRequest,
    InvocationResult, NumericStringPolicy, ParameterDescriptor, RecordDescriptor, SchemaDocument,
    SchemaNode, SessionId, ToolArguments, ToolDescriptor, ToolError, ToolErrorKind,
    ToolExecutionContext, ToolFuture, ToolHandler, ToolRegistry, ToolRuntime, ToolSet,
    TypeDescriptor,
};

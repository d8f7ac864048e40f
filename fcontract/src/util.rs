//! Small convenience constructors for common types.

use serde_json::Value;

use crate::{
    AsyncToolFn, FunctionTool, InvocationRequest, Parameters, SessionId, SyncToolFn,
    ToolExecutionContext,
};

pub fn tool<F, Args>(name: impl Into<String>, function: F) -> FunctionTool
where
    F: SyncToolFn<Args>,
    Args: Parameters,
{
    FunctionTool::from_fn(name, function)
}

pub fn async_tool<F, Args>(name: impl Into<String>, function: F) -> FunctionTool
where
    F: AsyncToolFn<Args>,
    Args: Parameters,
{
    FunctionTool::from_async_fn(name, function)
}

pub fn request(
    call_id: impl Into<String>,
    tool_name: impl Into<String>,
    arguments: Value,
) -> InvocationRequest {
    InvocationRequest::new(call_id, tool_name, arguments)
}

pub fn context(session_id: impl Into<SessionId>) -> ToolExecutionContext {
    ToolExecutionContext::new(session_id)
}

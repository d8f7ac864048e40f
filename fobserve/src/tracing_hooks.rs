//! Tracing-based observability hooks for tool dispatch.
//!
//! ```rust
//! use fobserve::TracingObservabilityHooks;
//! use ftooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use ftooling::{
    InvocationRequest, InvocationResult, ToolError, ToolExecutionContext, ToolRuntimeHooks,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_dispatch_start(&self, request: &InvocationRequest, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "dispatch_start",
            tool_name = request.tool_name,
            tool_call_id = request.call_id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_dispatch_success(
        &self,
        request: &InvocationRequest,
        context: &ToolExecutionContext,
        _result: &InvocationResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "dispatch_success",
            tool_name = request.tool_name,
            tool_call_id = request.call_id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_dispatch_failure(
        &self,
        request: &InvocationRequest,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        // Argument mistakes are the model's to fix; they are not service errors.
        if error.is_user_error() {
            tracing::warn!(
                phase = "tool",
                event = "dispatch_rejected",
                tool_name = request.tool_name,
                tool_call_id = request.call_id,
                session_id = %context.session_id,
                trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
                elapsed_ms = elapsed.as_millis() as u64,
                error_kind = error.kind.as_str(),
                path = error.path.as_deref(),
                error = %error
            );
            return;
        }

        tracing::error!(
            phase = "tool",
            event = "dispatch_failure",
            tool_name = request.tool_name,
            tool_call_id = request.call_id,
            session_id = %context.session_id,
            trace_id = context.trace_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = error.kind.as_str(),
            retryable = error.retryable,
            error = %error
        );
    }
}

//! Metrics-based observability hooks for tool dispatch.
//!
//! ```rust
//! use fobserve::MetricsObservabilityHooks;
//! use ftooling::ToolRuntimeHooks;
//!
//! fn accepts_tool_hooks(_hooks: &dyn ToolRuntimeHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_tool_hooks(&hooks);
//! ```

use std::time::Duration;

use ftooling::{
    InvocationRequest, InvocationResult, ToolError, ToolExecutionContext, ToolRuntimeHooks,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_dispatch_start(&self, request: &InvocationRequest, _context: &ToolExecutionContext) {
        metrics::counter!(
            "fcontract_tool_dispatch_start_total",
            "tool_name" => request.tool_name.clone()
        )
        .increment(1);
    }

    fn on_dispatch_success(
        &self,
        request: &InvocationRequest,
        _context: &ToolExecutionContext,
        _result: &InvocationResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "fcontract_tool_dispatch_success_total",
            "tool_name" => request.tool_name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "fcontract_tool_dispatch_duration_seconds",
            "tool_name" => request.tool_name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_dispatch_failure(
        &self,
        request: &InvocationRequest,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "fcontract_tool_dispatch_failure_total",
            "tool_name" => request.tool_name.clone(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "fcontract_tool_dispatch_duration_seconds",
            "tool_name" => request.tool_name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ftooling::{
    Dispatcher, FunctionTool, InvocationRequest, InvocationResult, ToolError,
    ToolExecutionContext, ToolRegistry, ToolRuntime, ToolRuntimeHooks,
};
use serde_json::json;

use crate::{MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};

fn sample_request() -> InvocationRequest {
    InvocationRequest::new("call-1", "add", json!({ "arg0": 1, "arg1": 2 }))
}

fn sample_context() -> ToolExecutionContext {
    ToolExecutionContext::new("session-1").with_trace_id("trace-1")
}

fn exercise(hooks: &dyn ToolRuntimeHooks) {
    let request = sample_request();
    let context = sample_context();

    hooks.on_dispatch_start(&request, &context);
    hooks.on_dispatch_success(
        &request,
        &context,
        &InvocationResult::success(&request, json!(3)),
        Duration::from_millis(20),
    );
    hooks.on_dispatch_failure(
        &request,
        &context,
        &ToolError::execution("tool failed"),
        Duration::from_millis(20),
    );
    hooks.on_dispatch_failure(
        &request,
        &context,
        &ToolError::invalid_arguments("expected integer").with_path("arg1"),
        Duration::from_millis(1),
    );
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    exercise(&TracingObservabilityHooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    exercise(&MetricsObservabilityHooks);
}

#[derive(Clone, Default)]
struct RecordingToolHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ToolRuntimeHooks for RecordingToolHooks {
    fn on_dispatch_start(&self, _request: &InvocationRequest, _context: &ToolExecutionContext) {
        self.events.lock().expect("events lock").push("start");
    }

    fn on_dispatch_success(
        &self,
        _request: &InvocationRequest,
        _context: &ToolExecutionContext,
        _result: &InvocationResult,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("success");
    }

    fn on_dispatch_failure(
        &self,
        _request: &InvocationRequest,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.events.lock().expect("events lock").push("failure");
    }
}

struct PanicToolHooks;

impl ToolRuntimeHooks for PanicToolHooks {
    fn on_dispatch_start(&self, _request: &InvocationRequest, _context: &ToolExecutionContext) {
        panic!("start panic");
    }

    fn on_dispatch_success(
        &self,
        _request: &InvocationRequest,
        _context: &ToolExecutionContext,
        _result: &InvocationResult,
        _elapsed: Duration,
    ) {
        panic!("success panic");
    }

    fn on_dispatch_failure(
        &self,
        _request: &InvocationRequest,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

#[test]
fn safe_tool_hooks_delegate_when_inner_succeeds() {
    let recording = RecordingToolHooks::default();
    let hooks = SafeToolHooks::new(recording.clone());

    exercise(&hooks);

    let events = recording.events.lock().expect("events lock").clone();
    assert_eq!(events, vec!["start", "success", "failure", "failure"]);
}

#[test]
fn safe_tool_hooks_swallow_panics() {
    exercise(&SafeToolHooks::new(PanicToolHooks));
}

fn add(left: i32, right: i32) -> Result<i32, String> {
    Ok(left + right)
}

#[tokio::test]
async fn panicking_observer_does_not_disturb_dispatch() {
    let mut builder = ToolRegistry::builder();
    builder
        .register(FunctionTool::from_fn("add", add))
        .expect("add registers");
    let dispatcher = Dispatcher::new(Arc::new(builder.build()))
        .with_hooks(Arc::new(SafeToolHooks::new(PanicToolHooks)));

    let result = dispatcher.dispatch(sample_request(), &sample_context()).await;
    assert_eq!(result.return_value, json!(3));
}

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use fschema::{Describe, RecordDescriptor, TypeDescriptor};
use ftooling::{
    DispatchPolicy, Dispatcher, FunctionTool, InvocationRequest, NumericStringPolicy,
    ToolErrorKind, ToolExecutionContext, ToolRegistry, ToolRuntime, ToolSet,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Unit {
    Celsius,
    Fahrenheit,
}

impl Describe for Unit {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::enumeration(["CELSIUS", "FAHRENHEIT"])
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct Ancestor {
    name: String,
    children: Vec<Ancestor>,
}

impl Describe for Ancestor {
    fn describe() -> TypeDescriptor {
        RecordDescriptor::new("family::Ancestor")
            .field::<String>("name")
            .field::<Vec<Ancestor>>("children")
            .into()
    }
}

fn count(ancestor: &Ancestor) -> usize {
    1 + ancestor.children.iter().map(count).sum::<usize>()
}

fn add(left: i32, right: i32) -> Result<i32, String> {
    Ok(left + right)
}

fn convert(reading: f64, unit: Unit) -> Result<f64, String> {
    Ok(match unit {
        Unit::Celsius => reading,
        Unit::Fahrenheit => (reading - 32.0) * 5.0 / 9.0,
    })
}

fn fail(reason: String) -> Result<(), String> {
    Err(reason)
}

fn registry() -> Arc<ToolRegistry> {
    let mut builder = ToolRegistry::builder();
    builder
        .register(FunctionTool::from_fn("add", add).with_description("Adds two integers"))
        .expect("add registers");
    builder
        .register(FunctionTool::from_fn("convert", convert))
        .expect("convert registers");
    builder
        .register(FunctionTool::from_fn("fail", fail))
        .expect("fail registers");
    builder
        .register(FunctionTool::from_fn("family_size", |root: Ancestor| {
            Ok::<_, String>(count(&root))
        }))
        .expect("family_size registers");
    builder
        .register(FunctionTool::from_async_fn("sleep", |millis: u64| async move {
            futures_timer::Delay::new(Duration::from_millis(millis)).await;
            Ok::<_, String>(millis)
        }))
        .expect("sleep registers");
    builder
        .register(FunctionTool::from_fn("block", |millis: u64| {
            thread::sleep(Duration::from_millis(millis));
            Ok::<_, String>(millis)
        }))
        .expect("block registers");
    Arc::new(builder.build())
}

fn context() -> ToolExecutionContext {
    ToolExecutionContext::new("session-1").with_trace_id("trace-1")
}

#[tokio::test]
async fn add_receives_coerced_arguments_and_returns_unchanged_result() {
    let dispatcher = Dispatcher::new(registry());

    let result = dispatcher
        .dispatch(
            InvocationRequest::new("call_1", "add", json!({ "arg0": 37, "arg1": 87 })),
            &context(),
        )
        .await;

    assert!(result.is_success());
    assert_eq!(result.call_id, "call_1");
    assert_eq!(result.return_value, json!(124));
}

#[tokio::test]
async fn undeclared_enum_value_is_an_argument_failure() {
    let dispatcher = Dispatcher::new(registry());

    let result = dispatcher
        .dispatch(
            InvocationRequest::new("call_2", "convert", json!({ "arg0": 50, "arg1": "KELVIN" })),
            &context(),
        )
        .await;

    let error = result.error.expect("KELVIN is not declared");
    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert_eq!(error.path.as_deref(), Some("arg1"));
    assert!(error.is_user_error());
}

#[tokio::test]
async fn unknown_tool_is_reported_with_its_name() {
    let dispatcher = Dispatcher::new(registry());

    let result = dispatcher
        .dispatch(InvocationRequest::new("call_3", "teleport", json!({})), &context())
        .await;

    assert_eq!(result.tool_name, "teleport");
    let error = result.error.expect("teleport is not registered");
    assert_eq!(error.kind, ToolErrorKind::UnknownTool);
    assert_eq!(error.tool_name.as_deref(), Some("teleport"));
    assert_eq!(error.tool_call_id.as_deref(), Some("call_3"));
}

#[tokio::test]
async fn tool_errors_become_execution_failures() {
    let dispatcher = Dispatcher::new(registry());

    let result = dispatcher
        .dispatch(
            InvocationRequest::new("call_4", "fail", json!({ "arg0": "disk full" })),
            &context(),
        )
        .await;

    let content = result.to_content();
    let error = result.error.expect("tool failed");
    assert_eq!(error.kind, ToolErrorKind::Execution);
    assert_eq!(error.message, "disk full");
    assert!(content.contains("disk full"));
}

#[tokio::test]
async fn recursive_arguments_are_coerced_through_references() {
    let dispatcher = Dispatcher::new(registry());
    let family = json!({
        "arg0": {
            "name": "Ada",
            "children": [
                { "name": "Byron", "children": [] },
                { "name": "Anne", "children": [ { "name": "Ralph", "children": [], "pet": "cat" } ] }
            ]
        }
    });

    let result = dispatcher
        .dispatch(InvocationRequest::new("call_5", "family_size", family), &context())
        .await;
    assert_eq!(result.return_value, json!(4));

    let broken = json!({
        "arg0": { "name": "Ada", "children": [ { "name": "Byron", "children": [ { "name": 1, "children": [] } ] } ] }
    });
    let result = dispatcher
        .dispatch(InvocationRequest::new("call_6", "family_size", broken), &context())
        .await;
    let error = result.error.expect("nested name is not a string");
    assert_eq!(error.path.as_deref(), Some("arg0.children[0].children[0].name"));
}

#[tokio::test]
async fn numeric_strings_follow_the_policy() {
    let request = || InvocationRequest::new("call_7", "add", json!({ "arg0": "37", "arg1": 87 }));

    let strict = Dispatcher::new(registry());
    assert!(strict.dispatch(request(), &context()).await.error.is_some());

    let lenient = Dispatcher::new(registry())
        .with_policy(DispatchPolicy::default().with_numeric_strings(NumericStringPolicy::Parse))
        .expect("policy is valid");
    let result = lenient.dispatch(request(), &context()).await;
    assert_eq!(result.return_value, json!(124));
}

#[tokio::test]
async fn batch_results_are_keyed_by_call_id_in_request_order() {
    let dispatcher = Dispatcher::new(registry())
        .with_policy(DispatchPolicy::concurrent(4))
        .expect("policy is valid");

    let results = dispatcher
        .dispatch_all(
            vec![
                InvocationRequest::new("slow", "sleep", json!({ "arg0": 40 })),
                InvocationRequest::new("fast", "add", json!({ "arg0": 1, "arg1": 1 })),
                InvocationRequest::new("broken", "missing", json!({})),
            ],
            &context(),
        )
        .await;

    let ids: Vec<&str> = results.iter().map(|result| result.call_id.as_str()).collect();
    assert_eq!(ids, vec!["slow", "fast", "broken"]);
    assert_eq!(results[0].return_value, json!(40));
    assert_eq!(results[1].return_value, json!(2));
    assert!(results[2].error.is_some());
}

#[tokio::test]
async fn timeout_wrapper_reports_expiry() {
    let dispatcher = Dispatcher::new(registry());

    let result = dispatcher
        .dispatch_with_timeout(
            InvocationRequest::new("call_8", "sleep", json!({ "arg0": 5_000 })),
            &context(),
            Duration::from_millis(20),
        )
        .await;

    let error = result.error.expect("sleep outlives the timeout");
    assert_eq!(error.kind, ToolErrorKind::Timeout);
    assert!(error.is_retryable());

    let quick = dispatcher
        .dispatch_with_timeout(
            InvocationRequest::new("call_9", "sleep", json!({ "arg0": 1 })),
            &context(),
            Duration::from_secs(5),
        )
        .await;
    assert_eq!(quick.return_value, json!(1));
}

#[tokio::test]
async fn timeout_wrapper_interrupts_blocking_sync_tools() {
    let dispatcher = Dispatcher::new(registry());
    let started = Instant::now();

    let result = dispatcher
        .dispatch_with_timeout(
            InvocationRequest::new("call_10", "block", json!({ "arg0": 500 })),
            &context(),
            Duration::from_millis(20),
        )
        .await;

    let error = result.error.expect("blocking body outlives the timeout");
    assert_eq!(error.kind, ToolErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_millis(400));
}

#[tokio::test]
async fn concurrent_batch_overlaps_blocking_sync_tools() {
    let dispatcher = Dispatcher::new(registry())
        .with_policy(DispatchPolicy::concurrent(4))
        .expect("policy is valid");
    let requests = (0..4)
        .map(|index| InvocationRequest::new(format!("call_{index}"), "block", json!({ "arg0": 250 })))
        .collect();
    let started = Instant::now();

    let results = dispatcher.dispatch_all(requests, &context()).await;

    assert!(results.iter().all(|result| result.return_value == json!(250)));
    assert!(
        started.elapsed() < Duration::from_millis(750),
        "four 250 ms calls took {:?}",
        started.elapsed()
    );
}

struct Counter {
    calls: AtomicUsize,
}

impl ToolSet for Counter {
    fn tools(self: Arc<Self>) -> Vec<FunctionTool> {
        let receiver = Arc::clone(&self);
        vec![
            FunctionTool::from_fn("increment", move |by: usize| {
                Ok::<_, String>(receiver.calls.fetch_add(by, Ordering::SeqCst) + by)
            })
            .with_parameter_name(0, "by"),
            FunctionTool::from_fn("current", move || {
                Ok::<_, String>(self.calls.load(Ordering::SeqCst))
            }),
        ]
    }
}

#[tokio::test]
async fn tool_sets_share_their_receiver() {
    let counter = Arc::new(Counter {
        calls: AtomicUsize::new(0),
    });
    let mut builder = ToolRegistry::builder();
    builder
        .register_shared_set(Arc::clone(&counter))
        .expect("counter tools register");
    let dispatcher = Dispatcher::new(Arc::new(builder.build()));

    dispatcher
        .dispatch(InvocationRequest::new("a", "increment", json!({ "by": 2 })), &context())
        .await;
    dispatcher
        .dispatch(InvocationRequest::new("b", "increment", json!({ "by": 3 })), &context())
        .await;
    let current = dispatcher
        .dispatch(InvocationRequest::new("c", "current", json!(null)), &context())
        .await;

    assert_eq!(current.return_value, json!(5));
    assert_eq!(counter.calls.load(Ordering::SeqCst), 5);
}

#[test]
fn zero_parameter_tools_omit_parameters_in_definitions() {
    let registry = {
        let mut builder = ToolRegistry::builder();
        builder
            .register(FunctionTool::from_fn("clock", || Ok::<_, String>("17:11:45")))
            .expect("clock registers");
        builder
            .register(FunctionTool::from_fn("add", add))
            .expect("add registers");
        builder.build()
    };

    let definitions = registry.definitions();
    assert_eq!(definitions[0], json!({ "name": "clock" }));
    assert_eq!(
        definitions[1]["parameters"]["required"],
        json!(["arg0", "arg1"])
    );
}

//! Invocation dispatcher: lookup, coercion, invocation and result packaging.
//!
//! Dispatch never fails as a whole. Unknown tools, malformed arguments, tool
//! errors and panics all come back as a failed [`InvocationResult`] keyed by
//! the request's call id.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};
use futures_util::{FutureExt, StreamExt, stream};
use serde_json::Value;

use crate::{
    DispatchPolicy, InvocationRequest, InvocationResult, NoopToolRuntimeHooks, ToolError,
    ToolExecutionContext, ToolFuture, ToolRegistry, ToolRuntimeHooks,
};

pub trait ToolRuntime: Send + Sync {
    fn dispatch<'a>(
        &'a self,
        request: InvocationRequest,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, InvocationResult>;
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
    policy: DispatchPolicy,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
            policy: DispatchPolicy::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Result<Self, ToolError> {
        policy.validate()?;
        self.policy = policy;
        Ok(self)
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Dispatches a call whose arguments are still the provider's JSON text.
    pub async fn dispatch_raw(
        &self,
        call_id: &str,
        tool_name: &str,
        raw_arguments: &str,
        context: &ToolExecutionContext,
    ) -> InvocationResult {
        match InvocationRequest::from_raw_arguments(call_id, tool_name, raw_arguments) {
            Ok(request) => self.run(request, context).await,
            Err(error) => {
                let request = InvocationRequest::new(call_id, tool_name, Value::Null);
                self.hooks.on_dispatch_start(&request, context);
                self.complete(&request, context, Err(error), Instant::now())
            }
        }
    }

    /// Dispatches one model turn's calls. Results come back in request order;
    /// the policy decides how many run at once.
    pub async fn dispatch_all(
        &self,
        requests: Vec<InvocationRequest>,
        context: &ToolExecutionContext,
    ) -> Vec<InvocationResult> {
        let limit = self.policy.concurrency_limit();
        tracing::debug!(calls = requests.len(), limit, "dispatching tool batch");

        stream::iter(requests)
            .map(|request| self.run(request, context))
            .buffered(limit)
            .collect()
            .await
    }

    /// Races one dispatch against a timer. Expiry yields a `Timeout` failure;
    /// the abandoned call is dropped. A sync body already running on the
    /// blocking pool finishes in the background and its value is discarded.
    pub async fn dispatch_with_timeout(
        &self,
        request: InvocationRequest,
        context: &ToolExecutionContext,
        timeout: Duration,
    ) -> InvocationResult {
        let pending = InvocationRequest::new(
            request.call_id.clone(),
            request.tool_name.clone(),
            Value::Null,
        );
        let started = Instant::now();

        match select(self.run(request, context), Delay::new(timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                let error = ToolError::timeout(format!(
                    "tool '{}' did not finish within {} ms",
                    pending.tool_name,
                    timeout.as_millis()
                ));
                self.complete(&pending, context, Err(error), started)
            }
        }
    }

    fn run<'a>(
        &'a self,
        request: InvocationRequest,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, InvocationResult> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_dispatch_start(&request, context);
            let outcome = self.invoke(&request, context).await;
            self.complete(&request, context, outcome, started)
        })
    }

    async fn invoke(
        &self,
        request: &InvocationRequest,
        context: &ToolExecutionContext,
    ) -> Result<Value, ToolError> {
        let tool = self.registry.lookup(&request.tool_name)?;
        let arguments = tool.bind_arguments(&request.arguments, self.policy.numeric_strings)?;
        let call = tool.handle().call(arguments, context);

        if !self.policy.catch_panics {
            return call.await;
        }

        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(ToolError::execution(format!(
                "tool panicked: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }

    fn complete(
        &self,
        request: &InvocationRequest,
        context: &ToolExecutionContext,
        outcome: Result<Value, ToolError>,
        started: Instant,
    ) -> InvocationResult {
        let elapsed = started.elapsed();
        match outcome {
            Ok(value) => {
                let result = InvocationResult::success(request, value);
                self.hooks
                    .on_dispatch_success(request, context, &result, elapsed);
                result
            }
            Err(error) => {
                let error = match error.tool_name {
                    Some(_) => error,
                    None => error.with_tool_name(request.tool_name.clone()),
                };
                let result = InvocationResult::failure(request, error);
                if let Some(error) = &result.error {
                    self.hooks
                        .on_dispatch_failure(request, context, error, elapsed);
                }
                result
            }
        }
    }
}

impl ToolRuntime for Dispatcher {
    fn dispatch<'a>(
        &'a self,
        request: InvocationRequest,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, InvocationResult> {
        self.run(request, context)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

//! Wiring helpers for registries and dispatchers.

use std::sync::Arc;

use crate::{
    DispatchPolicy, Dispatcher, FunctionTool, MetricsObservabilityHooks, SafeToolHooks,
    ToolError, ToolRegistry, ToolRuntimeHooks, TracingObservabilityHooks,
};

/// Registers every tool and freezes the registry; the first failing tool aborts.
pub fn build_registry(
    tools: impl IntoIterator<Item = FunctionTool>,
) -> Result<Arc<ToolRegistry>, ToolError> {
    let mut builder = ToolRegistry::builder();
    for tool in tools {
        builder.register(tool)?;
    }
    Ok(Arc::new(builder.build()))
}

/// A sequential dispatcher over `tools` that logs through `tracing`.
pub fn build_dispatcher(
    tools: impl IntoIterator<Item = FunctionTool>,
) -> Result<Dispatcher, ToolError> {
    observed_dispatcher(build_registry(tools)?, DispatchPolicy::default())
}

pub fn build_dispatcher_with(
    registry: Arc<ToolRegistry>,
    hooks: Option<Arc<dyn ToolRuntimeHooks>>,
    policy: DispatchPolicy,
) -> Result<Dispatcher, ToolError> {
    let dispatcher = Dispatcher::new(registry).with_policy(policy)?;
    Ok(match hooks {
        Some(hooks) => dispatcher.with_hooks(hooks),
        None => dispatcher,
    })
}

pub fn observed_dispatcher(
    registry: Arc<ToolRegistry>,
    policy: DispatchPolicy,
) -> Result<Dispatcher, ToolError> {
    build_dispatcher_with(
        registry,
        Some(Arc::new(SafeToolHooks::new(TracingObservabilityHooks))),
        policy,
    )
}

pub fn metered_dispatcher(
    registry: Arc<ToolRegistry>,
    policy: DispatchPolicy,
) -> Result<Dispatcher, ToolError> {
    build_dispatcher_with(
        registry,
        Some(Arc::new(SafeToolHooks::new(MetricsObservabilityHooks))),
        policy,
    )
}

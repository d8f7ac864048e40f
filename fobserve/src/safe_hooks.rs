use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use ftooling::{
    InvocationRequest, InvocationResult, ToolError, ToolExecutionContext, ToolRuntimeHooks,
};

/// Swallows panics raised by the wrapped hooks so dispatch is never disturbed.
pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_dispatch_start(&self, request: &InvocationRequest, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_start(request, context)
        }));
    }

    fn on_dispatch_success(
        &self,
        request: &InvocationRequest,
        context: &ToolExecutionContext,
        result: &InvocationResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_dispatch_success(request, context, result, elapsed)
        }));
    }

    fn on_dispatch_failure(
        &self,
        request: &InvocationRequest,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_dispatch_failure(request, context, error, elapsed)
        }));
    }
}

//! Observability hooks for the tool dispatcher.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fobserve::{MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
//! use ftooling::{Dispatcher, ToolRegistry};
//!
//! let dispatcher = Dispatcher::new(Arc::new(ToolRegistry::default()))
//!     .with_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks)));
//! let _metrics = MetricsObservabilityHooks;
//! assert!(dispatcher.registry().is_empty());
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeToolHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{MetricsObservabilityHooks, SafeToolHooks, TracingObservabilityHooks};
}

#[cfg(test)]
mod tests;

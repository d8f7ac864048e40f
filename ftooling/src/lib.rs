//! Tool handles, the frozen tool registry and the invocation dispatcher.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ftooling::{Dispatcher, FunctionTool, InvocationRequest, ToolExecutionContext, ToolRegistry, ToolRuntime};
//! use serde_json::json;
//!
//! fn add(left: i32, right: i32) -> Result<i32, String> {
//!     Ok(left + right)
//! }
//!
//! let mut builder = ToolRegistry::builder();
//! builder.register(FunctionTool::from_fn("add", add)).expect("add registers");
//! let dispatcher = Dispatcher::new(Arc::new(builder.build()));
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .build()
//!     .expect("runtime should build");
//! let result = runtime.block_on(dispatcher.dispatch(
//!     InvocationRequest::new("call_1", "add", json!({ "arg0": 37, "arg1": 87 })),
//!     &ToolExecutionContext::new("session-1"),
//! ));
//!
//! assert_eq!(result.return_value, json!(124));
//! ```

mod args;
mod coerce;
mod error;
mod handler;
mod hooks;
mod policy;
mod registry;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DispatchPolicy, Dispatcher, FunctionTool, InvocationRequest, InvocationResult,
        RegisteredTool, ToolArguments, ToolDescriptor, ToolError, ToolErrorKind,
        ToolExecutionContext, ToolFuture, ToolHandler, ToolRegistry, ToolRegistryBuilder,
        ToolRuntime, ToolRuntimeHooks, ToolSet,
    };
}

pub use args::{parse_arguments, parse_json_object};
pub use coerce::ArgumentCoercer;
pub use error::{ToolError, ToolErrorKind};
pub use handler::{AsyncToolFn, Parameters, SyncToolFn};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use policy::{DispatchMode, DispatchPolicy, NumericStringPolicy};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use runtime::{Dispatcher, ToolRuntime};
pub use tool::{
    FunctionTool, RegisteredTool, ToolArguments, ToolDescriptor, ToolFuture, ToolHandle,
    ToolHandler, ToolSet,
};
pub use types::{InvocationRequest, InvocationResult, ToolExecutionContext};

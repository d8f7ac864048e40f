//! Tool registry: append-only while building, frozen for dispatch.
//!
//! ```rust
//! use ftooling::{FunctionTool, ToolErrorKind, ToolRegistryBuilder};
//!
//! let mut builder = ToolRegistryBuilder::new();
//! builder
//!     .register(FunctionTool::from_fn("ping", || Ok::<_, String>("pong")))
//!     .expect("first registration succeeds");
//!
//! let duplicate = builder
//!     .register(FunctionTool::from_fn("ping", || Ok::<_, String>("again")))
//!     .expect_err("names are unique");
//! assert_eq!(duplicate.kind, ToolErrorKind::DuplicateToolName);
//!
//! let registry = builder.build();
//! assert!(registry.lookup("ping").is_ok());
//! assert_eq!(
//!     registry.lookup("pong").expect_err("not registered").kind,
//!     ToolErrorKind::UnknownTool
//! );
//! ```

use std::sync::Arc;

use fcommon::Registry;
use serde_json::Value;

use crate::{FunctionTool, RegisteredTool, ToolDescriptor, ToolError, ToolSet};

#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tools: Registry<String, RegisteredTool>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and registers one tool. A failure leaves the builder unchanged.
    pub fn register(&mut self, tool: FunctionTool) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        let tool = tool.build().inspect_err(|error| {
            tracing::warn!(tool_name = %name, error = %error, "tool rejected");
        })?;
        self.register_tool(tool)
    }

    pub fn register_tool(&mut self, tool: RegisteredTool) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        let arity = tool.handle().parameter_names().len();

        if self.tools.try_insert(name.clone(), tool).is_err() {
            tracing::warn!(tool_name = %name, "duplicate tool name rejected");
            return Err(ToolError::duplicate_tool_name(name));
        }

        tracing::debug!(tool_name = %name, arity, "tool registered");
        Ok(())
    }

    /// Registers every tool of a set; stops at the first failure.
    pub fn register_set<S>(&mut self, set: S) -> Result<(), ToolError>
    where
        S: ToolSet,
    {
        self.register_shared_set(Arc::new(set))
    }

    pub fn register_shared_set<S>(&mut self, set: Arc<S>) -> Result<(), ToolError>
    where
        S: ToolSet,
    {
        for tool in set.tools() {
            self.register(tool)?;
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn build(self) -> ToolRegistry {
        tracing::debug!(tools = self.tools.len(), "tool registry frozen");
        ToolRegistry { tools: self.tools }
    }
}

/// Immutable name → tool table, safe for concurrent reads.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Registry<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn lookup(&self, name: &str) -> Result<&RegisteredTool, ToolError> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values().map(RegisteredTool::descriptor)
    }

    /// Model-facing tool definitions in registration order.
    pub fn definitions(&self) -> Vec<Value> {
        self.descriptors().map(ToolDescriptor::to_json).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.values().map(RegisteredTool::name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

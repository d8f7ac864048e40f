//! Tool registration and dispatch errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use fschema::{SchemaError, SchemaErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolErrorKind {
    UnknownTool,
    DuplicateToolName,
    UnsupportedType,
    InvalidArguments,
    Execution,
    Timeout,
    InvalidPolicy,
    DuplicateParameterName,
    InvalidSchema,
}

impl ToolErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::DuplicateToolName => "duplicate_tool_name",
            Self::UnsupportedType => "unsupported_type",
            Self::InvalidArguments => "invalid_arguments",
            Self::Execution => "execution",
            Self::Timeout => "timeout",
            Self::InvalidPolicy => "invalid_policy",
            Self::DuplicateParameterName => "duplicate_parameter_name",
            Self::InvalidSchema => "invalid_schema",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
    /// Argument path for argument and schema errors, e.g. `arg0.children[1].name`.
    pub path: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            tool_name: None,
            tool_call_id: None,
            path: None,
        }
    }

    pub fn unknown_tool(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self::new(
            ToolErrorKind::UnknownTool,
            format!("tool '{tool_name}' is not registered"),
            false,
        )
        .with_tool_name(tool_name)
    }

    pub fn duplicate_tool_name(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self::new(
            ToolErrorKind::DuplicateToolName,
            format!("tool '{tool_name}' is already registered"),
            false,
        )
        .with_tool_name(tool_name)
    }

    pub fn unsupported_type(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::UnsupportedType, message, false)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message, false)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message, true)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message, true)
    }

    pub fn invalid_policy(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidPolicy, message, false)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Errors the model caused and can fix in its next turn.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::InvalidArguments | ToolErrorKind::UnknownTool
        )
    }

    /// Errors raised while building a registry or dispatcher rather than while dispatching.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::DuplicateToolName
                | ToolErrorKind::UnsupportedType
                | ToolErrorKind::InvalidPolicy
                | ToolErrorKind::DuplicateParameterName
                | ToolErrorKind::InvalidSchema
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;

        let mut context = Vec::new();
        if let Some(tool_name) = &self.tool_name {
            context.push(format!("tool={tool_name}"));
        }
        if let Some(tool_call_id) = &self.tool_call_id {
            context.push(format!("call_id={tool_call_id}"));
        }
        if let Some(path) = &self.path {
            context.push(format!("path={path}"));
        }
        if !context.is_empty() {
            write!(f, " [{}]", context.join(", "))?;
        }

        write!(f, ": {}", self.message)
    }
}

impl Error for ToolError {}

impl From<SchemaError> for ToolError {
    fn from(value: SchemaError) -> Self {
        let kind = match value.kind {
            SchemaErrorKind::UnsupportedType => ToolErrorKind::UnsupportedType,
            SchemaErrorKind::DuplicateParameter => ToolErrorKind::DuplicateParameterName,
            SchemaErrorKind::DanglingReference | SchemaErrorKind::InvalidDocument => {
                ToolErrorKind::InvalidSchema
            }
        };
        let error = ToolError::new(kind, value.message, false);
        match value.path {
            Some(path) => error.with_path(path),
            None => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_methods_report_retryable_and_user_error() {
        let timeout = ToolError::timeout("slow");
        assert!(timeout.is_retryable());
        assert!(!timeout.is_user_error());

        let invalid = ToolError::invalid_arguments("bad args");
        assert!(!invalid.is_retryable());
        assert!(invalid.is_user_error());

        let duplicate = ToolError::duplicate_tool_name("add");
        assert!(duplicate.is_build_error());
        assert_eq!(duplicate.tool_name.as_deref(), Some("add"));
    }

    #[test]
    fn context_fields_are_included_in_display() {
        let error = ToolError::invalid_arguments("expected integer")
            .with_tool_name("lookup")
            .with_tool_call_id("call_1")
            .with_path("arg0.age");

        let rendered = error.to_string();
        assert!(rendered.contains("lookup"));
        assert!(rendered.contains("call_1"));
        assert!(rendered.contains("arg0.age"));
    }

    #[test]
    fn unknown_tool_preserves_requested_name() {
        let error = ToolError::unknown_tool("missing");
        assert_eq!(error.kind, ToolErrorKind::UnknownTool);
        assert_eq!(error.tool_name.as_deref(), Some("missing"));
        assert!(error.message.contains("missing"));
    }

    #[test]
    fn schema_errors_become_unsupported_type_with_path() {
        let schema_error = SchemaError::unsupported_type("arg0.payload", "serde_json::Value");
        let error = ToolError::from(schema_error);

        assert_eq!(error.kind, ToolErrorKind::UnsupportedType);
        assert_eq!(error.path.as_deref(), Some("arg0.payload"));
    }

    #[test]
    fn schema_error_kinds_keep_their_own_classification() {
        let duplicate = ToolError::from(SchemaError::duplicate_parameter("arg0"));
        assert_eq!(duplicate.kind, ToolErrorKind::DuplicateParameterName);
        assert!(duplicate.is_build_error());

        let dangling = ToolError::from(SchemaError::dangling_reference("abc"));
        assert_eq!(dangling.kind, ToolErrorKind::InvalidSchema);
        assert!(dangling.is_build_error());
    }
}

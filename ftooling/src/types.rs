//! Dispatch context, invocation request and invocation result types.

use fcommon::{MetadataMap, SessionId, TraceId};
use serde_json::{Value, json};

use crate::{ToolError, parse_arguments};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub session_id: SessionId,
    pub trace_id: Option<TraceId>,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            trace_id: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// One tool call issued by the model in a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub call_id: String,
    pub tool_name: String,
    pub arguments: Value,
}

impl InvocationRequest {
    pub fn new(call_id: impl Into<String>, tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Builds a request from the JSON argument string a provider returned.
    pub fn from_raw_arguments(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        raw_arguments: &str,
    ) -> Result<Self, ToolError> {
        let call_id = call_id.into();
        let tool_name = tool_name.into();
        let arguments = parse_arguments(raw_arguments).map_err(|error| {
            error
                .with_tool_name(tool_name.clone())
                .with_tool_call_id(call_id.clone())
        })?;

        Ok(Self {
            call_id,
            tool_name,
            arguments,
        })
    }
}

/// Outcome of one dispatch, keyed by the call id of its request.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub call_id: String,
    pub tool_name: String,
    pub return_value: Value,
    pub error: Option<ToolError>,
}

impl InvocationResult {
    pub fn success(request: &InvocationRequest, return_value: Value) -> Self {
        Self {
            call_id: request.call_id.clone(),
            tool_name: request.tool_name.clone(),
            return_value,
            error: None,
        }
    }

    pub fn failure(request: &InvocationRequest, error: ToolError) -> Self {
        Self::failed(request.call_id.clone(), request.tool_name.clone(), error)
    }

    pub fn failed(call_id: impl Into<String>, tool_name: impl Into<String>, error: ToolError) -> Self {
        let call_id = call_id.into();
        let error = match error.tool_call_id {
            Some(_) => error,
            None => error.with_tool_call_id(call_id.clone()),
        };

        Self {
            call_id,
            tool_name: tool_name.into(),
            return_value: Value::Null,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_outcome(self) -> Result<Value, ToolError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.return_value),
        }
    }

    /// Text handed back to the model: string results verbatim, other results
    /// as JSON, failures as a JSON error object the model can react to.
    pub fn to_content(&self) -> String {
        match &self.error {
            Some(error) => json!({
                "error": {
                    "kind": error.kind.as_str(),
                    "tool": self.tool_name,
                    "message": error.message,
                    "path": error.path,
                }
            })
            .to_string(),
            None => match &self.return_value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        }
    }
}

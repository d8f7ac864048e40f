//! Dispatch configuration.
//!
//! ```rust
//! use ftooling::{DispatchMode, DispatchPolicy, NumericStringPolicy};
//!
//! let policy = DispatchPolicy::concurrent(4).with_numeric_strings(NumericStringPolicy::Parse);
//! assert_eq!(policy.mode, DispatchMode::Concurrent);
//! assert!(policy.validate().is_ok());
//!
//! assert!(DispatchPolicy::concurrent(0).validate().is_err());
//! ```

use crate::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Calls from one turn run one after another, in request order.
    Sequential,
    /// Calls from one turn run together, bounded by `max_concurrent_calls`.
    Concurrent,
}

/// Whether a JSON string such as `"37"` is accepted where a number is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericStringPolicy {
    #[default]
    Reject,
    Parse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub mode: DispatchMode,
    pub max_concurrent_calls: usize,
    pub numeric_strings: NumericStringPolicy,
    /// Report a panicking tool body as an execution failure instead of unwinding.
    pub catch_panics: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Sequential,
            max_concurrent_calls: 1,
            numeric_strings: NumericStringPolicy::Reject,
            catch_panics: true,
        }
    }
}

impl DispatchPolicy {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn concurrent(max_concurrent_calls: usize) -> Self {
        Self {
            mode: DispatchMode::Concurrent,
            max_concurrent_calls,
            ..Self::default()
        }
    }

    pub fn with_numeric_strings(mut self, numeric_strings: NumericStringPolicy) -> Self {
        self.numeric_strings = numeric_strings;
        self
    }

    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        match self.mode {
            DispatchMode::Sequential => Ok(()),
            DispatchMode::Concurrent if self.max_concurrent_calls == 0 => {
                Err(ToolError::invalid_policy(
                    "concurrent dispatch requires max_concurrent_calls >= 1",
                ))
            }
            DispatchMode::Concurrent => Ok(()),
        }
    }

    /// Number of calls from one batch allowed in flight at once.
    pub fn concurrency_limit(&self) -> usize {
        match self.mode {
            DispatchMode::Sequential => 1,
            DispatchMode::Concurrent => self.max_concurrent_calls.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolErrorKind;

    #[test]
    fn default_policy_is_sequential_and_strict() {
        let policy = DispatchPolicy::default();
        assert_eq!(policy, DispatchPolicy::sequential());
        assert_eq!(policy.numeric_strings, NumericStringPolicy::Reject);
        assert!(policy.catch_panics);
        assert_eq!(policy.concurrency_limit(), 1);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let error = DispatchPolicy::concurrent(0)
            .validate()
            .expect_err("zero is not a usable limit");
        assert_eq!(error.kind, ToolErrorKind::InvalidPolicy);
    }

    #[test]
    fn concurrent_policy_reports_its_limit() {
        assert_eq!(DispatchPolicy::concurrent(8).concurrency_limit(), 8);
    }
}

//! Typed function adapters.
//!
//! Plain functions and closures of up to eight parameters become tool
//! handlers. Each parameter type supplies its schema through
//! [`fschema::Describe`] and is decoded from the coerced arguments with serde;
//! the `Ok` value is serialized back to JSON and the `Err` value becomes an
//! execution failure. Sync bodies run on tokio's blocking pool and therefore
//! need a tokio runtime at dispatch time.
//!
//! ```rust
//! use ftooling::{FunctionTool, Parameters};
//!
//! fn add(left: i32, right: i32) -> Result<i32, String> {
//!     Ok(left + right)
//! }
//!
//! assert_eq!(<(i32, i32) as Parameters>::descriptors().len(), 2);
//!
//! let tool = FunctionTool::from_fn("add", add).build().expect("integers are supported");
//! let names: Vec<&str> = tool.handle().parameter_names().iter().map(String::as_str).collect();
//! assert_eq!(names, vec!["arg0", "arg1"]);
//! ```

use std::fmt::Display;
use std::future::Future;
use std::marker::PhantomData;
use std::panic;
use std::sync::Arc;

use fschema::{Describe, ParameterDescriptor};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::task;

use crate::{ToolArguments, ToolError, ToolExecutionContext, ToolFuture, ToolHandler};

/// A positional parameter list, implemented for tuples of describable types.
pub trait Parameters: Sized + Send + 'static {
    fn descriptors() -> Vec<ParameterDescriptor>;

    fn from_arguments(arguments: ToolArguments) -> Result<Self, ToolError>;
}

pub trait SyncToolFn<Args>: Send + Sync + 'static {
    fn call(&self, args: Args) -> Result<Value, ToolError>;
}

pub trait AsyncToolFn<Args>: Send + Sync + 'static {
    fn call(&self, args: Args) -> ToolFuture<'static, Result<Value, ToolError>>;
}

/// Runs the body on tokio's blocking pool, so a blocking tool neither stalls
/// the dispatching task nor defeats timeouts and concurrent batches.
pub(crate) struct SyncFnHandler<F, Args> {
    function: Arc<F>,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> SyncFnHandler<F, Args> {
    pub(crate) fn new(function: F) -> Self {
        Self {
            function: Arc::new(function),
            _args: PhantomData,
        }
    }
}

impl<F, Args> ToolHandler for SyncFnHandler<F, Args>
where
    F: SyncToolFn<Args>,
    Args: Parameters,
{
    fn call<'a>(
        &'a self,
        arguments: ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let args = Args::from_arguments(arguments)?;
            let function = Arc::clone(&self.function);
            match task::spawn_blocking(move || function.call(args)).await {
                Ok(outcome) => outcome,
                // Re-raised here so the dispatcher's panic policy applies.
                Err(error) if error.is_panic() => panic::resume_unwind(error.into_panic()),
                Err(error) => Err(ToolError::execution(format!(
                    "tool body was cancelled: {error}"
                ))),
            }
        })
    }
}

pub(crate) struct AsyncFnHandler<F, Args> {
    function: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> AsyncFnHandler<F, Args> {
    pub(crate) fn new(function: F) -> Self {
        Self {
            function,
            _args: PhantomData,
        }
    }
}

impl<F, Args> ToolHandler for AsyncFnHandler<F, Args>
where
    F: AsyncToolFn<Args>,
    Args: Parameters,
{
    fn call<'a>(
        &'a self,
        arguments: ToolArguments,
        _context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let args = Args::from_arguments(arguments)?;
            self.function.call(args).await
        })
    }
}

fn next_argument<T>(entries: &mut impl Iterator<Item = (String, Value)>) -> Result<T, ToolError>
where
    T: DeserializeOwned,
{
    let (name, value) = entries
        .next()
        .unwrap_or_else(|| (String::new(), Value::Null));

    serde_json::from_value(value).map_err(|error| {
        let error = ToolError::invalid_arguments(format!("argument could not be decoded: {error}"));
        if name.is_empty() {
            error
        } else {
            error.with_path(name)
        }
    })
}

fn encode<R, E>(output: Result<R, E>) -> Result<Value, ToolError>
where
    R: Serialize,
    E: Display,
{
    let output = output.map_err(|error| ToolError::execution(error.to_string()))?;
    serde_json::to_value(output)
        .map_err(|error| ToolError::execution(format!("tool result is not serializable: {error}")))
}

macro_rules! impl_tool_fn {
    ($($ty:ident),*) => {
        impl<$($ty,)*> Parameters for ($($ty,)*)
        where
            $($ty: Describe + DeserializeOwned + Send + 'static,)*
        {
            fn descriptors() -> Vec<ParameterDescriptor> {
                vec![$(ParameterDescriptor::of::<$ty>(),)*]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_arguments(arguments: ToolArguments) -> Result<Self, ToolError> {
                let mut entries = arguments.into_entries().into_iter();
                Ok(($(next_argument::<$ty>(&mut entries)?,)*))
            }
        }

        impl<F, R, E, $($ty,)*> SyncToolFn<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> Result<R, E> + Send + Sync + 'static,
            R: Serialize,
            E: Display,
        {
            #[allow(non_snake_case)]
            fn call(&self, ($($ty,)*): ($($ty,)*)) -> Result<Value, ToolError> {
                encode((self)($($ty),*))
            }
        }

        impl<F, Fut, R, E, $($ty,)*> AsyncToolFn<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<R, E>> + Send + 'static,
            R: Serialize,
            E: Display,
        {
            #[allow(non_snake_case)]
            fn call(&self, ($($ty,)*): ($($ty,)*)) -> ToolFuture<'static, Result<Value, ToolError>> {
                let future = (self)($($ty),*);
                Box::pin(async move { encode(future.await) })
            }
        }
    };
}

impl_tool_fn!();
impl_tool_fn!(A1);
impl_tool_fn!(A1, A2);
impl_tool_fn!(A1, A2, A3);
impl_tool_fn!(A1, A2, A3, A4);
impl_tool_fn!(A1, A2, A3, A4, A5);
impl_tool_fn!(A1, A2, A3, A4, A5, A6);
impl_tool_fn!(A1, A2, A3, A4, A5, A6, A7);
impl_tool_fn!(A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    fn arguments(entries: &[(&str, Value)]) -> ToolArguments {
        ToolArguments::new(
            entries
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn tuples_decode_positionally() {
        let decoded = <(String, Option<u8>, Vec<bool>)>::from_arguments(arguments(&[
            ("arg0", json!("Ada")),
            ("arg1", Value::Null),
            ("arg2", json!([true, false])),
        ]))
        .expect("arguments decode");

        assert_eq!(decoded, ("Ada".to_string(), None, vec![true, false]));
    }

    #[test]
    fn decode_failures_carry_the_parameter_name() {
        let error = <(u8,)>::from_arguments(arguments(&[("count", json!(300))]))
            .expect_err("300 does not fit in u8");

        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
        assert_eq!(error.path.as_deref(), Some("count"));
    }

    #[test]
    fn sync_functions_serialize_results_and_errors() {
        fn divide(left: i64, right: i64) -> Result<i64, String> {
            if right == 0 {
                return Err("division by zero".to_string());
            }
            Ok(left / right)
        }

        assert_eq!(SyncToolFn::call(&divide, (84_i64, 2_i64)).expect("divides"), json!(42));

        let error = SyncToolFn::call(&divide, (1_i64, 0_i64)).expect_err("zero divisor");
        assert_eq!(error.kind, ToolErrorKind::Execution);
        assert_eq!(error.message, "division by zero");
    }

    #[tokio::test]
    async fn sync_bodies_run_off_the_dispatching_thread() {
        let dispatching = std::thread::current().id();
        let handler = SyncFnHandler::<_, ()>::new(move || -> Result<bool, String> {
            Ok(std::thread::current().id() != dispatching)
        });

        let value = ToolHandler::call(
            &handler,
            ToolArguments::default(),
            &ToolExecutionContext::new("session-1"),
        )
        .await
        .expect("body runs");
        assert_eq!(value, json!(true));
    }

    #[tokio::test]
    async fn async_closures_are_awaited() {
        let greet = |name: String| async move { Ok::<_, String>(format!("hello {name}")) };

        let value = AsyncToolFn::call(&greet, ("Ada".to_string(),))
            .await
            .expect("greets");
        assert_eq!(value, json!("hello Ada"));
    }

    #[test]
    fn zero_arity_has_no_descriptors() {
        assert!(<() as Parameters>::descriptors().is_empty());
        assert!(<()>::from_arguments(ToolArguments::default()).is_ok());
    }
}

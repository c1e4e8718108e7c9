//! Function application

use futures::future::{try_join_all, BoxFuture, FutureExt};

use super::{Cx, Mode};
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::value::{Deferred, Value};

/// Evaluate `[head, ...operands]` as a function application.
///
/// The head is evaluated first and must be callable; only then are the
/// operands evaluated.
pub(crate) async fn apply<'a>(
    cx: Cx<'a>,
    head: &'a Value,
    operands: &'a [Value],
    env: &'a Environment,
) -> Result<Value> {
    let callee = cx.eval(head, env).await?;
    if !callee.is_callable() {
        return Err(EvalError::NotCallable {
            head: head.to_string(),
        });
    }

    let args = eval_args(cx, operands, env).await?;
    tracing::trace!(head = %head, argc = args.len(), "applying");
    call_value(cx, callee, args).await
}

async fn eval_args<'a>(
    cx: Cx<'a>,
    operands: &'a [Value],
    env: &'a Environment,
) -> Result<Vec<Value>> {
    match cx.mode() {
        Mode::Blocking => {
            let mut args = Vec::with_capacity(operands.len());
            for operand in operands {
                args.push(cx.eval(operand, env).await?);
            }
            Ok(args)
        }
        // All operands in flight at once; the first failure wins
        Mode::Suspending => try_join_all(operands.iter().map(|operand| cx.eval(operand, env))).await,
    }
}

/// Call a Value as a function.
///
/// # Errors
///
/// Returns `NotCallable` if the value is not callable. Errors raised by the
/// callable itself are returned unchanged.
pub fn call_value(cx: Cx<'_>, callee: Value, args: Vec<Value>) -> BoxFuture<'_, Result<Value>> {
    async move {
        match callee {
            Value::Builtin(f) => f.call(&args),
            Value::AsyncBuiltin(f) => {
                let pending = f.call(args)?;
                match cx.mode() {
                    Mode::Blocking => Ok(Value::Deferred(Deferred::new(pending))),
                    Mode::Suspending => pending.await,
                }
            }
            Value::Closure(closure) => {
                let scope = closure.bind(args)?;
                cx.eval(&closure.body, &scope).await
            }
            other => Err(EvalError::NotCallable {
                head: other.to_string(),
            }),
        }
    }
    .boxed()
}

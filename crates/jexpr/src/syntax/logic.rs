//! Short-circuit `and` / `or`

use futures::future::{BoxFuture, FutureExt};

use super::SpecialForm;
use crate::environment::Environment;
use crate::error::Result;
use crate::eval::Cx;
use crate::value::Value;

/// `[and, e1, e2, ...]`: `false` at the first falsy operand, else `true`.
pub struct And;

impl SpecialForm for And {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            for expr in operands {
                if !cx.eval(expr, env).await?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        .boxed()
    }
}

/// `[or, e1, e2, ...]`: `true` at the first truthy operand, else `false`.
pub struct Or;

impl SpecialForm for Or {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            for expr in operands {
                if cx.eval(expr, env).await?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        .boxed()
    }
}

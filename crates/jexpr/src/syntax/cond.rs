//! `cond` form

use futures::future::{BoxFuture, FutureExt};

use super::{operand, SpecialForm};
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::eval::Cx;
use crate::value::Value;

/// `[cond, [test, value], ...]`
///
/// Tests are evaluated in order; the value of the first truthy clause is
/// the result, `null` if none matches. Later clauses are never touched.
pub struct Cond;

impl SpecialForm for Cond {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            for clause in operands {
                let parts = clause.as_list().ok_or_else(|| {
                    EvalError::malformed("cond", format!("clause must be a list, got {}", clause))
                })?;
                if cx.eval(operand(parts, 0), env).await?.is_truthy() {
                    return cx.eval(operand(parts, 1), env).await;
                }
            }
            Ok(Value::Null)
        }
        .boxed()
    }
}

//! `let` form

use futures::future::{BoxFuture, FutureExt};

use super::{operand, SpecialForm};
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::eval::Cx;
use crate::value::Value;

/// `[let, [$a, e1, $b, e2, ...], body]`
///
/// All bindings go into one child scope, left to right, so each value sees
/// the names bound before it. A trailing name without a value is ignored.
pub struct Let;

impl SpecialForm for Let {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            let bindings = operand(operands, 0).as_list().ok_or_else(|| {
                EvalError::malformed(
                    "let",
                    format!("bindings must be a list, got {}", operand(operands, 0)),
                )
            })?;

            let scope = env.child();
            for pair in bindings.chunks_exact(2) {
                let name = cx.binding_name("let", &pair[0])?;
                let value = cx.eval(&pair[1], &scope).await?;
                scope.define(name, value);
            }

            cx.eval(operand(operands, 1), &scope).await
        }
        .boxed()
    }
}

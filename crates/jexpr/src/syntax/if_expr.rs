//! `if` form

use futures::future::{BoxFuture, FutureExt};

use super::{operand, SpecialForm};
use crate::environment::Environment;
use crate::error::Result;
use crate::eval::Cx;
use crate::value::Value;

/// `[if, cond, then, else]`
///
/// Only the selected branch is evaluated; a missing branch yields `null`.
pub struct If;

impl SpecialForm for If {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            let cond = cx.eval(operand(operands, 0), env).await?;
            let branch = if cond.is_truthy() {
                operand(operands, 1)
            } else {
                operand(operands, 2)
            };
            cx.eval(branch, env).await
        }
        .boxed()
    }
}

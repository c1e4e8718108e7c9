//! `do` form

use futures::future::{BoxFuture, FutureExt};

use super::SpecialForm;
use crate::environment::Environment;
use crate::error::Result;
use crate::eval::Cx;
use crate::value::Value;

/// `[do, e1, ..., en]` evaluates everything in order and returns `en`.
pub struct Do;

impl SpecialForm for Do {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            let mut last = Value::Null;
            for expr in operands {
                last = cx.eval(expr, env).await?;
            }
            Ok(last)
        }
        .boxed()
    }
}

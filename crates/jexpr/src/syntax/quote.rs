//! `quote` and `eval`: code as data and back

use futures::future::{self, BoxFuture, FutureExt};

use super::{operand, SpecialForm};
use crate::environment::Environment;
use crate::error::Result;
use crate::eval::Cx;
use crate::value::Value;

/// `[quote, expr]` returns `expr` exactly as written.
pub struct Quote;

impl SpecialForm for Quote {
    fn eval<'a>(
        &'a self,
        _cx: Cx<'a>,
        operands: &'a [Value],
        _env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        future::ready(Ok(operand(operands, 0).clone())).boxed()
    }
}

/// `[eval, expr]` evaluates `expr`, then evaluates the result as code.
pub struct Eval;

impl SpecialForm for Eval {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            let code = cx.eval(operand(operands, 0), env).await?;
            cx.eval(&code, env).await
        }
        .boxed()
    }
}

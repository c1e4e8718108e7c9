//! `def` form

use futures::future::{BoxFuture, FutureExt};

use super::{operand, SpecialForm};
use crate::environment::Environment;
use crate::error::Result;
use crate::eval::Cx;
use crate::value::Value;

/// `[def, $name, expr]` binds `name` in the current scope and returns the
/// bound value.
///
/// The current scope may be a `let` or call scope; the binding never leaks
/// into its parent.
pub struct Def;

impl SpecialForm for Def {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        async move {
            let name = cx.binding_name("def", operand(operands, 0))?;
            let value = cx.eval(operand(operands, 1), env).await?;
            tracing::debug!(%name, depth = env.depth(), "def");
            env.define(name, value.clone());
            Ok(value)
        }
        .boxed()
    }
}

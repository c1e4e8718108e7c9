//! `fn` form

use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use super::{operand, SpecialForm};
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::eval::Cx;
use crate::value::{Closure, Value};

/// `[fn, [$p1, $p2, ...], body]` creates a closure over the current scope.
pub struct Lambda;

impl Lambda {
    fn closure(cx: Cx<'_>, operands: &[Value], env: &Environment) -> Result<Value> {
        let params = operand(operands, 0).as_list().ok_or_else(|| {
            EvalError::malformed(
                "fn",
                format!("parameters must be a list, got {}", operand(operands, 0)),
            )
        })?;
        let params = params
            .iter()
            .map(|param| cx.binding_name("fn", param))
            .collect::<Result<Vec<_>>>()?;

        Ok(Value::Closure(Arc::new(Closure::new(
            params,
            operand(operands, 1).clone(),
            env.clone(),
        ))))
    }
}

impl SpecialForm for Lambda {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        future::ready(Self::closure(cx, operands, env)).boxed()
    }
}

//! Expression evaluation
//!
//! There is one evaluation algorithm. Every step returns a boxed future and
//! the [`Mode`] decides what happens at the points where a value might be
//! pending:
//!
//! - [`Mode::Blocking`]: pending values are ordinary values, async builtins
//!   hand back their future as a [`Value::Deferred`], and arguments are
//!   evaluated strictly left to right. Nothing ever waits, so the top-level
//!   future completes on its first poll.
//! - [`Mode::Suspending`]: every result is settled (pending values awaited)
//!   before use, and the arguments of one application run concurrently.

pub mod call;
mod stack;

use futures::future::{BoxFuture, FutureExt};

use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::evaluator::Evaluator;
use crate::symbol::{Node, Prefix};
use crate::value::Value;
use stack::StackGuarded;

pub use call::call_value;

/// Execution mode of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Synchronous, depth-first, never suspends
    Blocking,
    /// Cooperative; pending values are awaited
    Suspending,
}

/// Per-call evaluation state handed to every rule.
///
/// Carries the evaluator (registry, prefix, limits), the active mode and the
/// current depth. Special forms evaluate their operands through it so that
/// they run in whichever mode the caller started.
#[derive(Clone, Copy)]
pub struct Cx<'a> {
    evaluator: &'a Evaluator,
    mode: Mode,
    depth: usize,
}

impl<'a> Cx<'a> {
    pub(crate) fn new(evaluator: &'a Evaluator, mode: Mode) -> Self {
        Self {
            evaluator,
            mode,
            depth: 0,
        }
    }

    /// The active execution mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current evaluation depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The evaluator running this evaluation.
    pub fn evaluator(&self) -> &'a Evaluator {
        self.evaluator
    }

    /// The symbol prefix in effect.
    pub fn prefix(&self) -> Prefix {
        self.evaluator.prefix()
    }

    /// Read a binding name (`$x` or `x`) out of a form operand.
    ///
    /// # Errors
    ///
    /// `MalformedForm` naming `keyword` if `token` is not a string.
    pub fn binding_name(&self, keyword: &str, token: &Value) -> Result<String> {
        match token.as_str() {
            Some(s) => Ok(self.prefix().name(s).to_string()),
            None => Err(EvalError::malformed(
                keyword,
                format!("expected a symbol, got {}", token),
            )),
        }
    }

    /// Evaluate `expr` in `env` in the active mode.
    pub fn eval<'b>(self, expr: &'b Value, env: &'b Environment) -> BoxFuture<'b, Result<Value>>
    where
        'a: 'b,
    {
        let cx: Cx<'b> = self;
        let step = async move {
            let cx = cx.descend()?;
            let value = eval_node(cx, expr, env).await?;
            match cx.mode {
                Mode::Blocking => Ok(value),
                Mode::Suspending => settle(value).await,
            }
        };
        StackGuarded::new(step.boxed()).boxed()
    }

    /// Evaluate `expr` and require the result without suspending.
    ///
    /// For blocking rules of host forms. Fails with `Suspended` if something
    /// underneath actually had to wait.
    pub fn eval_blocking(self, expr: &Value, env: &Environment) -> Result<Value> {
        self.eval(expr, env)
            .now_or_never()
            .unwrap_or(Err(EvalError::Suspended))
    }

    fn descend(self) -> Result<Self> {
        let depth = self.depth + 1;
        let max = self.evaluator.context().max_depth;
        if depth > max {
            return Err(EvalError::DepthExceeded { depth, max });
        }
        Ok(Self { depth, ..self })
    }
}

impl std::fmt::Debug for Cx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cx")
            .field("mode", &self.mode)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

async fn eval_node<'a>(cx: Cx<'a>, expr: &'a Value, env: &'a Environment) -> Result<Value> {
    match cx.prefix().classify(expr) {
        Node::Literal(value) => Ok(value.clone()),
        Node::Text(_) => Ok(expr.clone()),
        Node::Escaped(text) => Ok(Value::string(text)),
        Node::Symbol(name) => Ok(env.get(name).unwrap_or(Value::Null)),
        Node::Form { head, operands } => eval_form(cx, head, operands, env).await,
        Node::EmptyForm => Err(EvalError::NotCallable {
            head: expr.to_string(),
        }),
    }
}

async fn eval_form<'a>(
    cx: Cx<'a>,
    head: &'a Value,
    operands: &'a [Value],
    env: &'a Environment,
) -> Result<Value> {
    if let Value::String(s) = head {
        let keyword = cx.prefix().name(s.as_str());
        let handler = cx.evaluator.syntax().get(keyword);
        if let Some(handler) = handler {
            tracing::trace!(keyword, mode = ?cx.mode, depth = cx.depth, "special form");
            return handler.eval(cx, operands, env).await;
        }
    }

    call::apply(cx, head, operands, env).await
}

/// Await pending values until a settled one comes out.
pub(crate) async fn settle(mut value: Value) -> Result<Value> {
    loop {
        match value {
            Value::Deferred(pending) => value = pending.resolve().await?,
            settled => return Ok(settled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_flattens_nested_deferred() {
        let nested = Value::resolved(Value::resolved(Value::Int(1)));
        let value = futures::executor::block_on(settle(nested)).unwrap();
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn test_settle_surfaces_rejection() {
        let failed = Value::Deferred(crate::Deferred::rejected(EvalError::host("boom")));
        let err = futures::executor::block_on(settle(failed)).unwrap_err();
        assert_eq!(err, EvalError::host("boom"));
    }

    #[test]
    fn test_binding_name_strips_prefix() {
        let evaluator = Evaluator::new();
        let cx = Cx::new(&evaluator, Mode::Blocking);
        assert_eq!(cx.binding_name("def", &Value::string("$x")).unwrap(), "x");
        assert_eq!(cx.binding_name("def", &Value::string("y")).unwrap(), "y");
        assert!(matches!(
            cx.binding_name("def", &Value::Int(1)),
            Err(EvalError::MalformedForm { .. })
        ));
    }

    #[test]
    fn test_depth_counts_nested_evaluation() {
        let evaluator = Evaluator::builder().max_depth(3).build();
        let cx = Cx::new(&evaluator, Mode::Blocking);
        let env = evaluator.env().clone();

        let shallow = Value::from(serde_json::json!(["$add", 1, 2]));
        assert_eq!(cx.eval_blocking(&shallow, &env).unwrap(), Value::Int(3));

        let deep = Value::from(serde_json::json!(["$add", ["$add", ["$add", 1, 2], 3], 4]));
        assert!(matches!(
            cx.eval_blocking(&deep, &env),
            Err(EvalError::DepthExceeded { max: 3, .. })
        ));
    }
}

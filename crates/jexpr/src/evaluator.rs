//! The public evaluator: root environment, special forms, entry points

use std::sync::Arc;

use futures::future::FutureExt;

use crate::context::EvalContext;
use crate::environment::Environment;
use crate::error::{EvalError, Result};
use crate::eval::{call_value, settle, Cx, Mode};
use crate::symbol::Prefix;
use crate::syntax::{SpecialForm, SyntaxRegistry};
use crate::value::Value;

/// Evaluates expressions against a root environment.
///
/// Dropping the evaluator clears its root environment, including through
/// any handle obtained from [`Evaluator::env`].
///
/// # Example
///
/// ```
/// use jexpr::{Evaluator, Value};
/// use serde_json::json;
///
/// let evaluator = Evaluator::new();
/// let expr = Value::from(json!(["$add", 1, ["$multiply", 2, 3]]));
/// assert_eq!(evaluator.evaluate(&expr).unwrap(), Value::Int(7));
/// ```
pub struct Evaluator {
    env: Environment,
    syntax: SyntaxRegistry,
    context: EvalContext,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Create an evaluator with the builtin library and the built-in forms.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create an evaluator from host bindings.
    ///
    /// Builtins fill in only the names the host left free.
    pub fn with_bindings<I, K>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::builder().bindings(bindings).build()
    }

    /// Start configuring an evaluator.
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════

    /// The root environment.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The special-form registry.
    pub fn syntax(&self) -> &SyntaxRegistry {
        &self.syntax
    }

    /// The evaluation configuration.
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    /// The symbol prefix.
    pub fn prefix(&self) -> Prefix {
        self.context.symbol_prefix()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Definitions
    // ═══════════════════════════════════════════════════════════════════

    /// Bind or rebind `name` in the root environment.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        tracing::debug!(%name, kind = value.type_name(), "define");
        self.env.define(name, value);
    }

    /// Register or replace the special form for `keyword`.
    pub fn define_syntax(&self, keyword: impl Into<String>, form: impl SpecialForm + 'static) {
        self.syntax.define(keyword, form);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Evaluation
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate `expr` in blocking mode against the root environment.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&self, expr: &Value) -> Result<Value> {
        self.evaluate_in(expr, &self.env)
    }

    /// Evaluate `expr` in blocking mode against `env`.
    pub fn evaluate_in(&self, expr: &Value, env: &Environment) -> Result<Value> {
        Cx::new(self, Mode::Blocking).eval_blocking(expr, env)
    }

    /// Evaluate `expr` in suspending mode against the root environment.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn evaluate_async(&self, expr: &Value) -> Result<Value> {
        self.evaluate_async_in(expr, &self.env).await
    }

    /// Evaluate `expr` in suspending mode against `env`.
    pub async fn evaluate_async_in(&self, expr: &Value, env: &Environment) -> Result<Value> {
        Cx::new(self, Mode::Suspending).eval(expr, env).await
    }

    /// Call a builtin or closure from host code, in blocking mode.
    pub fn call(&self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        call_value(Cx::new(self, Mode::Blocking), callee.clone(), args)
            .now_or_never()
            .unwrap_or(Err(EvalError::Suspended))
    }

    /// Call a builtin or closure from host code, in suspending mode.
    pub async fn call_async(&self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        let value = call_value(Cx::new(self, Mode::Suspending), callee.clone(), args).await?;
        settle(value).await
    }
}

// Closures stored at the root can capture scopes that lead back to it.
// Clearing the root on drop releases those cycles.
impl Drop for Evaluator {
    fn drop(&mut self) {
        self.env.clear();
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("env", &self.env)
            .field("syntax", &self.syntax)
            .field("context", &self.context)
            .finish()
    }
}

/// Builder for [`Evaluator`].
///
/// Forms registered here are installed after the built-in ones, so they can
/// replace them.
#[derive(Default)]
pub struct EvaluatorBuilder {
    bindings: Vec<(String, Value)>,
    forms: Vec<(String, Arc<dyn SpecialForm>)>,
    context: EvalContext,
}

impl EvaluatorBuilder {
    /// Use a complete configuration.
    pub fn context(mut self, context: EvalContext) -> Self {
        self.context = context;
        self
    }

    /// Set the symbol prefix.
    pub fn prefix(mut self, prefix: char) -> Self {
        self.context.prefix = prefix;
        self
    }

    /// Set the maximum evaluation depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.context.max_depth = max_depth;
        self
    }

    /// Add one host binding.
    pub fn binding(mut self, name: impl Into<String>, value: Value) -> Self {
        self.bindings.push((name.into(), value));
        self
    }

    /// Add host bindings.
    pub fn bindings<I, K>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.bindings
            .extend(bindings.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Register a special form.
    pub fn syntax(mut self, keyword: impl Into<String>, form: impl SpecialForm + 'static) -> Self {
        self.forms.push((keyword.into(), Arc::new(form)));
        self
    }

    /// Build the evaluator.
    pub fn build(self) -> Evaluator {
        let env = Environment::with_bindings(self.bindings);
        env.load_prelude();

        let syntax = SyntaxRegistry::with_builtin_forms();
        for (keyword, form) in self.forms {
            syntax.define_shared(keyword, form);
        }

        tracing::debug!(
            prefix = %self.context.prefix,
            bindings = env.len(),
            forms = syntax.keywords().len(),
            "evaluator ready"
        );

        Evaluator {
            env,
            syntax,
            context: self.context,
        }
    }
}

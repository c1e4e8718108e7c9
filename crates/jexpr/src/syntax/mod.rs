//! Special forms and the registry that dispatches them
//!
//! A special form receives its operands unevaluated and decides itself what
//! to evaluate, in which order, and whether at all. Each built-in form is
//! written once against [`Cx`] and runs unchanged in both execution modes.

mod cond;
mod def;
mod do_block;
mod function;
mod if_expr;
mod let_expr;
mod logic;
mod quote;

pub use cond::Cond;
pub use def::Def;
pub use do_block::Do;
pub use function::Lambda;
pub use if_expr::If;
pub use let_expr::Let;
pub use logic::{And, Or};
pub use quote::{Eval, Quote};

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{self, BoxFuture, FutureExt};

use crate::environment::Environment;
use crate::error::Result;
use crate::eval::{Cx, Mode};
use crate::value::Value;

/// Keywords of the built-in forms, in installation order.
pub const BUILTIN_FORMS: [&str; 10] = [
    "cond", "if", "and", "or", "quote", "eval", "def", "do", "fn", "let",
];

/// An evaluation rule selected by a keyword.
pub trait SpecialForm: Send + Sync {
    /// Evaluate the form's unevaluated `operands` in `env`.
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>>;
}

/// Blocking rule of a [`SyntaxPair`].
pub type BlockingRule =
    Box<dyn for<'a> Fn(Cx<'a>, &'a [Value], &'a Environment) -> Result<Value> + Send + Sync>;

/// Suspending rule of a [`SyntaxPair`].
pub type SuspendingRule = Box<
    dyn for<'a> Fn(Cx<'a>, &'a [Value], &'a Environment) -> BoxFuture<'a, Result<Value>>
        + Send
        + Sync,
>;

/// A special form given as two separate rules, one per execution mode.
///
/// The two rules must agree on results; they differ only in how they wait.
pub struct SyntaxPair {
    blocking: BlockingRule,
    suspending: SuspendingRule,
}

impl SyntaxPair {
    /// Create a form from a blocking and a suspending rule.
    pub fn new<B, S>(blocking: B, suspending: S) -> Self
    where
        B: for<'a> Fn(Cx<'a>, &'a [Value], &'a Environment) -> Result<Value>
            + Send
            + Sync
            + 'static,
        S: for<'a> Fn(Cx<'a>, &'a [Value], &'a Environment) -> BoxFuture<'a, Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            blocking: Box::new(blocking),
            suspending: Box::new(suspending),
        }
    }
}

impl SpecialForm for SyntaxPair {
    fn eval<'a>(
        &'a self,
        cx: Cx<'a>,
        operands: &'a [Value],
        env: &'a Environment,
    ) -> BoxFuture<'a, Result<Value>> {
        match cx.mode() {
            Mode::Blocking => future::ready((self.blocking)(cx, operands, env)).boxed(),
            Mode::Suspending => (self.suspending)(cx, operands, env),
        }
    }
}

/// Keyword to special-form table.
#[derive(Default)]
pub struct SyntaxRegistry {
    forms: DashMap<String, Arc<dyn SpecialForm>>,
}

impl SyntaxRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the ten built-in forms.
    pub fn with_builtin_forms() -> Self {
        let registry = Self::new();
        registry.define("cond", Cond);
        registry.define("if", If);
        registry.define("and", And);
        registry.define("or", Or);
        registry.define("quote", Quote);
        registry.define("eval", Eval);
        registry.define("def", Def);
        registry.define("do", Do);
        registry.define("fn", Lambda);
        registry.define("let", Let);
        registry
    }

    /// Register or replace the form for `keyword`.
    pub fn define(&self, keyword: impl Into<String>, form: impl SpecialForm + 'static) {
        self.define_shared(keyword, Arc::new(form));
    }

    /// Register or replace the form for `keyword` from a shared handle.
    pub fn define_shared(&self, keyword: impl Into<String>, form: Arc<dyn SpecialForm>) {
        let keyword = keyword.into();
        if self.forms.insert(keyword.clone(), form).is_some() {
            tracing::debug!(%keyword, "special form replaced");
        }
    }

    /// Remove the form for `keyword`, returning whether one was registered.
    pub fn remove(&self, keyword: &str) -> bool {
        self.forms.remove(keyword).is_some()
    }

    /// Look up the form for `keyword`.
    pub fn get(&self, keyword: &str) -> Option<Arc<dyn SpecialForm>> {
        self.forms.get(keyword).map(|entry| entry.value().clone())
    }

    /// Check if `keyword` selects a special form.
    pub fn contains(&self, keyword: &str) -> bool {
        self.forms.contains_key(keyword)
    }

    /// All registered keywords, sorted.
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = self.forms.iter().map(|e| e.key().clone()).collect();
        keywords.sort();
        keywords
    }
}

impl std::fmt::Debug for SyntaxRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SyntaxRegistry").field(&self.keywords()).finish()
    }
}

static NULL: Value = Value::Null;

/// The operand at `index`, or `null` when the form is too short.
pub(crate) fn operand(operands: &[Value], index: usize) -> &Value {
    operands.get(index).unwrap_or(&NULL)
}

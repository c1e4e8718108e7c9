//! Evaluation context configuration

use serde::{Deserialize, Serialize};

use crate::symbol::Prefix;

/// Default maximum evaluation depth.
///
/// Every nested sub-expression is one level. A closure call costs at least
/// two (the call form and the body), so recursion through `fn` stops at
/// about 250 calls with this default, earlier when the body nests further.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration for an [`Evaluator`](crate::Evaluator).
///
/// Controls the symbol prefix and the recursion limit. Deserializable so
/// hosts can keep it in their own config files:
///
/// ```
/// use jexpr::EvalContext;
///
/// let ctx: EvalContext = serde_json::from_str(r#"{ "prefix": "@" }"#).unwrap();
/// assert_eq!(ctx.prefix, '@');
/// assert_eq!(ctx.max_depth, jexpr::context::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalContext {
    /// Character marking symbol references. Doubling it escapes a string.
    pub prefix: char,

    /// Maximum evaluation depth. The stack grows on demand below this
    /// limit; the limit bounds runaway recursion.
    pub max_depth: usize,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            prefix: '$',
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Create a context with a custom symbol prefix.
    pub fn with_prefix(prefix: char) -> Self {
        Self {
            prefix,
            ..Default::default()
        }
    }

    /// The symbol prefix as a [`Prefix`].
    pub fn symbol_prefix(&self) -> Prefix {
        Prefix::new(self.prefix)
    }
}

//! # jexpr
//!
//! A tree-walking evaluator for expressions written as plain data.
//!
//! There is no parser: a program is a JSON-shaped value. Strings starting
//! with the symbol prefix (`$` by default) are symbol references, a doubled
//! prefix escapes a literal string, and a list is either a special form
//! (when its head names one) or a function application.
//!
//! ```
//! use jexpr::{Evaluator, Value};
//! use serde_json::json;
//!
//! let evaluator = Evaluator::new();
//! let program = Value::from(json!(
//!     ["$let", ["$a", 1, "$b", ["$add", "$a", 1]],
//!         ["$if", ["$gt", "$b", "$a"], "$$bigger", "smaller"]]
//! ));
//! assert_eq!(evaluator.evaluate(&program).unwrap(), Value::string("$bigger"));
//! ```
//!
//! ## Execution Modes
//!
//! - [`Evaluator::evaluate`]: blocking; pending values stay opaque.
//! - [`Evaluator::evaluate_async`]: suspending; pending values and async
//!   builtins are awaited, and the arguments of an application are
//!   evaluated concurrently.
//!
//! Both modes run the same rules and agree on every expression whose
//! callables never suspend.
//!
//! ## Architecture
//!
//! - **value**: expressions and runtime values
//! - **symbol**: node classification and the symbol prefix
//! - **environment**: linked scopes and the builtin prelude
//! - **syntax**: special forms and their registry
//! - **eval**: the mode-parameterized evaluation core
//! - **evaluator**: the host-facing entry points

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod symbol;
pub mod syntax;
pub mod value;

// Re-export main types
pub use context::EvalContext;
pub use environment::Environment;
pub use error::{EvalError, Result};
pub use eval::{Cx, Mode};
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use symbol::{Node, Prefix};
pub use syntax::{SpecialForm, SyntaxPair, SyntaxRegistry};
pub use value::{AsyncBuiltinFn, BuiltinFn, Closure, Deferred, Value};

/// jexpr version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

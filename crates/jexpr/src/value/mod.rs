//! Value representation for expressions and runtime values

mod callable;
mod display;
mod impls;

pub use callable::{AsyncBuiltinFn, AsyncBuiltinFnPtr, BuiltinFn, BuiltinFnPtr, Closure, Deferred};

use std::collections::BTreeMap;
use std::sync::Arc;

/// An expression, and the value it evaluates to.
///
/// Programs are data: a JSON document converts directly into a `Value` and
/// can be evaluated. The variants fall into two tiers:
/// - Tier 1: the expression shapes (atoms, strings, lists)
/// - Tier 2: runtime-only values (callables and pending computations)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Expression Shapes
    // ═══════════════════════════════════════════════════════════════════
    /// The absent value. Unbound symbols resolve to it.
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// String: a literal, a symbol reference, or an escaped literal,
    /// depending on its prefix
    String(Arc<String>),

    /// Ordered sequence; a form when evaluated
    List(Arc<Vec<Value>>),

    /// String-keyed record. Opaque to the evaluator: evaluates to itself.
    Map(Arc<BTreeMap<String, Value>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Runtime Values
    // ═══════════════════════════════════════════════════════════════════
    /// Synchronous native function
    Builtin(BuiltinFn),

    /// Native function returning a pending computation
    AsyncBuiltin(AsyncBuiltinFn),

    /// Function created by `fn`, with its captured environment
    Closure(Arc<Closure>),

    /// A pending computation. Awaited in suspending mode, opaque in
    /// blocking mode.
    Deferred(Deferred),
}

impl Value {
    /// Name of this value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Builtin(_) => "builtin",
            Value::AsyncBuiltin(_) => "async builtin",
            Value::Closure(_) => "closure",
            Value::Deferred(_) => "deferred",
        }
    }

    /// Truthiness used by `if`, `cond`, `and`, `or` and `not`.
    ///
    /// `null`, `false`, zero, `NaN` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Check if the value can be applied to arguments.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Builtin(_) | Value::AsyncBuiltin(_) | Value::Closure(_)
        )
    }
}

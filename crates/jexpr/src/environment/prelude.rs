//! Standard prelude with built-in functions

use std::cmp::Ordering;

use super::Environment;
use crate::error::{EvalError, Result};
use crate::value::{BuiltinFn, Value};

/// Names of the prelude builtins, in definition order.
pub const PRELUDE_NAMES: [&str; 9] = [
    "gt", "lt", "eq", "add", "subtract", "multiply", "divide", "not", "list",
];

impl Environment {
    /// Create a root environment with the standard builtins.
    pub fn with_prelude() -> Self {
        let env = Self::new();
        env.load_prelude();
        env
    }

    /// Load the standard builtins into this scope.
    ///
    /// Names already bound here are left alone, so host bindings win over
    /// the defaults.
    pub fn load_prelude(&self) {
        for builtin in prelude() {
            let name = builtin.name.clone();
            if !self.define_if_absent(name.clone(), Value::Builtin(builtin)) {
                tracing::debug!(%name, "host binding shadows prelude builtin");
            }
        }
    }
}

/// The standard builtins.
pub fn prelude() -> Vec<BuiltinFn> {
    vec![
        // Comparison
        BuiltinFn::new("gt", 2, |args| compare(args, Ordering::Greater)),
        BuiltinFn::new("lt", 2, |args| compare(args, Ordering::Less)),
        BuiltinFn::new("eq", 2, |args| Ok(Value::Bool(args[0] == args[1]))),
        // Arithmetic
        BuiltinFn::new("add", 2, builtin_add),
        arithmetic("subtract", i64::checked_sub, |a, b| a - b),
        arithmetic("multiply", i64::checked_mul, |a, b| a * b),
        arithmetic("divide", exact_div, |a, b| a / b),
        // Boolean
        BuiltinFn::new("not", 1, |args| Ok(Value::Bool(!args[0].is_truthy()))),
        // Lists
        BuiltinFn::variadic("list", |args| Ok(Value::list(args.to_vec()))),
    ]
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Function Implementations
// ═══════════════════════════════════════════════════════════════════════

fn compare(args: &[Value], wanted: Ordering) -> Result<Value> {
    let ordering = match (&args[0], &args[1]) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (a, b) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => return Err(mismatch("comparable values", a, b)),
        },
    };
    // NaN compares false either way
    Ok(Value::Bool(ordering == Some(wanted)))
}

fn builtin_add(args: &[Value]) -> Result<Value> {
    if let (Value::String(a), Value::String(b)) = (&args[0], &args[1]) {
        return Ok(Value::string(format!("{}{}", a, b)));
    }
    numeric(&args[0], &args[1], i64::checked_add, |a, b| a + b)
}

fn arithmetic(
    name: &'static str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> BuiltinFn {
    BuiltinFn::new(name, 2, move |args| {
        numeric(&args[0], &args[1], int_op, float_op)
    })
}

/// Integer arithmetic when it is exact, float arithmetic otherwise.
fn numeric(
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    if let (Value::Int(x), Value::Int(y)) = (a, b) {
        if let Some(n) = int_op(*x, *y) {
            return Ok(Value::Int(n));
        }
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok(Value::Float(float_op(x, y))),
        _ => Err(mismatch("numbers", a, b)),
    }
}

fn exact_div(a: i64, b: i64) -> Option<i64> {
    a.checked_rem(b)
        .filter(|rem| *rem == 0)
        .and_then(|_| a.checked_div(b))
}

fn mismatch(expected: &str, a: &Value, b: &Value) -> EvalError {
    EvalError::type_error(expected, format!("{} and {}", a.type_name(), b.type_name()))
}

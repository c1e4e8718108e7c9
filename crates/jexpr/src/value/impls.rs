//! Value trait implementations: constructors, extractors, From traits, PartialEq, serde

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};

use super::*;
use crate::error::{EvalError, Result};

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Create a synchronous builtin with a fixed arity (-1 for variadic).
    pub fn builtin<F>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Value::Builtin(BuiltinFn::new(name, arity, func))
    }

    /// Create an async builtin with a fixed arity (-1 for variadic).
    pub fn async_builtin<F, Fut>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Value::AsyncBuiltin(AsyncBuiltinFn::new(name, arity, func))
    }

    /// Create a pending value from a future.
    pub fn deferred<F>(fut: F) -> Self
    where
        F: Future<Output = Result<Value>> + Send + 'static,
    {
        Value::Deferred(Deferred::new(fut))
    }

    /// Create an already-resolved pending value.
    pub fn resolved(value: Value) -> Self {
        Value::Deferred(Deferred::resolved(value))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a number, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract list items
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Convert to JSON.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` for callables and pending values.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| EvalError::ValueError(e.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,

            // Numbers compare by value across representations
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }

            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,

            // Callables and pending values by identity
            (Value::Builtin(a), Value::Builtin(b)) => Arc::ptr_eq(&a.func, &b.func),
            (Value::AsyncBuiltin(a), Value::AsyncBuiltin(b)) => Arc::ptr_eq(&a.func, &b.func),
            (Value::Closure(a), Value::Closure(b)) => a.same_function(b),
            (Value::Deferred(a), Value::Deferred(b)) => a.ptr_eq(b),

            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(Arc::new(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<BTreeMap<_, _>>(),
            )),
        }
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self> {
        value.to_json()
    }
}

// ═══════════════════════════════════════════════════════════════════
// Serde
// ═══════════════════════════════════════════════════════════════════

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items.iter()),
            Value::Map(map) => serializer.collect_map(map.iter()),
            other => Err(S::Error::custom(format!(
                "cannot serialize {} value",
                other.type_name()
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(json!(3)), Value::Int(3));
        assert!(matches!(Value::from(json!(1.5)), Value::Float(n) if n == 1.5));
    }

    #[test]
    fn test_from_json_nested_list() {
        let v = Value::from(json!(["$add", 1, [true, null]]));
        let expected = Value::list(vec![
            Value::string("$add"),
            Value::Int(1),
            Value::list(vec![Value::Bool(true), Value::Null]),
        ]);
        assert_eq!(v, expected);
    }

    #[test]
    fn test_int_float_equality() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Float(2.5));
    }

    #[test]
    fn test_to_json_rejects_callables() {
        let f = Value::builtin("id", 1, |args| Ok(args[0].clone()));
        assert!(matches!(f.to_json(), Err(EvalError::ValueError(_))));
        assert!(matches!(
            Value::list(vec![f]).to_json(),
            Err(EvalError::ValueError(_))
        ));
    }

    #[test]
    fn test_json_round_trip_of_map() {
        let source = json!({"name": "$x", "n": [1, 2]});
        let v = Value::from(source.clone());
        assert_eq!(v.to_json().unwrap(), source);
    }

    #[test]
    fn test_deserialize_from_str() {
        let v: Value = serde_json::from_str(r#"["$list", 1, "a"]"#).unwrap();
        assert_eq!(v.as_list().map(|items| items.len()), Some(3));
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::string("x"));
    }
}

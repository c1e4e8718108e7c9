//! Runtime environment managing symbol bindings

mod frame;
mod prelude;

pub use prelude::{prelude, PRELUDE_NAMES};

use std::fmt;
use std::sync::Arc;

use frame::Frame;

use crate::value::Value;

/// A scope of symbol bindings, linked to its parent scope.
///
/// `Environment` is a cheap handle: cloning it shares the same scope.
/// Child scopes see every binding of their ancestors (including ones
/// added later) but writes into a child never reach the parent.
///
/// # Example
///
/// ```
/// use jexpr::{Environment, Value};
///
/// let root = Environment::new();
/// root.define("x", Value::Int(1));
///
/// let child = root.child();
/// child.define("y", Value::Int(2));
/// child.define("x", Value::Int(10)); // Shadows outer x
///
/// assert_eq!(child.get("x"), Some(Value::Int(10)));
/// assert_eq!(child.get("y"), Some(Value::Int(2)));
///
/// assert_eq!(root.get("x"), Some(Value::Int(1))); // Parent unchanged
/// assert_eq!(root.get("y"), None);
/// ```
#[derive(Clone, Default)]
pub struct Environment {
    frame: Arc<Frame>,
}

impl Environment {
    /// Create a new empty root environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root environment holding the given bindings.
    pub fn with_bindings<I, K>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let env = Self::new();
        for (name, value) in bindings {
            env.define(name, value);
        }
        env
    }

    // ═══════════════════════════════════════════════════════════════════
    // Scope Structure
    // ═══════════════════════════════════════════════════════════════════

    /// Create an empty child scope of this one.
    pub fn child(&self) -> Self {
        Self {
            frame: Arc::new(Frame::child_of(&self.frame)),
        }
    }

    /// The enclosing scope, if this is not a root.
    pub fn parent(&self) -> Option<Self> {
        self.frame
            .parent
            .as_ref()
            .map(|frame| Self { frame: frame.clone() })
    }

    /// Number of scopes from the root to this one (root is 1).
    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    /// Check if this is a root scope.
    pub fn is_root(&self) -> bool {
        self.frame.parent.is_none()
    }

    /// Whether two handles refer to the same scope.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Arc::ptr_eq(&self.frame, &other.frame)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` in this scope, overwriting any binding it already has.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.frame.bindings.insert(name.into(), self.detach(value));
    }

    /// Bind `name` in this scope unless it is already bound here.
    ///
    /// Returns whether the binding was added.
    pub fn define_if_absent(&self, name: impl Into<String>, value: Value) -> bool {
        let mut added = false;
        self.frame.bindings.entry(name.into()).or_insert_with(|| {
            added = true;
            self.detach(value)
        });
        added
    }

    /// Remove every binding of this scope.
    pub fn clear(&self) {
        self.frame.bindings.clear();
    }

    // A closure over this very scope is stored detached, otherwise the
    // frame would own itself through the closure.
    fn detach(&self, value: Value) -> Value {
        if let Value::Closure(closure) = &value {
            if let Some(detached) = closure.detach_from(self) {
                return Value::Closure(Arc::new(detached));
            }
        }
        value
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding, innermost scope first.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut frame = Some(&self.frame);
        while let Some(current) = frame {
            if let Some(value) = current.bindings.get(name) {
                return Some(attach(value.value(), current));
            }
            frame = current.parent.as_ref();
        }
        None
    }

    /// Check if a binding exists in this scope or any ancestor.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if a binding exists in this scope only.
    pub fn contains_in_current_scope(&self, name: &str) -> bool {
        self.frame.bindings.contains_key(name)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Names bound in this scope, sorted.
    pub fn names_in_current_scope(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .frame
            .bindings
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// All visible names, sorted and deduplicated.
    pub fn all_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut frame = Some(&self.frame);
        while let Some(current) = frame {
            names.extend(current.bindings.iter().map(|entry| entry.key().clone()));
            frame = current.parent.as_ref();
        }
        names.sort();
        names.dedup();
        names
    }

    /// Number of bindings in this scope.
    pub fn len(&self) -> usize {
        self.frame.bindings.len()
    }

    /// Check if this scope has no bindings of its own.
    pub fn is_empty(&self) -> bool {
        self.frame.bindings.is_empty()
    }
}

fn attach(value: &Value, frame: &Arc<Frame>) -> Value {
    match value {
        Value::Closure(closure) if closure.is_detached() => {
            Value::Closure(Arc::new(closure.attach(Environment {
                frame: frame.clone(),
            })))
        }
        other => other.clone(),
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("depth", &self.depth())
            .field("names", &self.names_in_current_scope())
            .finish()
    }
}

//! Callable value types: builtins, closures, and pending computations

use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt, Shared};

use super::Value;
use crate::environment::Environment;
use crate::error::{EvalError, Result};

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Type alias for async builtin function pointers
pub type AsyncBuiltinFnPtr =
    Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// A built-in native function.
///
/// These are Rust functions exposed to the evaluator. Errors they return
/// propagate to the caller unchanged.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Create a builtin with a fixed arity.
    pub fn new<F>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Create a builtin accepting any number of arguments.
    pub fn variadic<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, -1, func)
    }

    /// Check the arity, then call the native function.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        check_arity(&self.name, self.arity, args.len())?;
        (self.func)(args)
    }
}

impl std::fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

/// A native function whose result is a pending computation.
///
/// In suspending mode the evaluator awaits the returned future; in blocking
/// mode the call yields a [`Value::Deferred`] wrapping it.
#[derive(Clone)]
pub struct AsyncBuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    pub func: AsyncBuiltinFnPtr,
}

impl AsyncBuiltinFn {
    /// Create an async builtin from a function returning a future.
    pub fn new<F, Fut>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(move |args| func(args).boxed()),
        }
    }

    /// Check the arity, then start the native computation.
    pub fn call(&self, args: Vec<Value>) -> Result<BoxFuture<'static, Result<Value>>> {
        check_arity(&self.name, self.arity, args.len())?;
        Ok((self.func)(args))
    }
}

impl std::fmt::Debug for AsyncBuiltinFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AsyncBuiltinFn({})", self.name)
    }
}

fn check_arity(name: &str, arity: i32, got: usize) -> Result<()> {
    if arity >= 0 && got != arity as usize {
        return Err(EvalError::ArityMismatch {
            name: name.to_string(),
            expected: arity as usize,
            got,
        });
    }
    Ok(())
}

/// A function created by the `fn` form.
///
/// A closure shares the scope it was created in. When it is stored into
/// that same scope (`[def, $f, [fn, ...]]`, a `let`-bound function), the
/// scope keeps a detached copy and reattaches itself on lookup, so the
/// scope and the closure never hold each other alive.
#[derive(Clone)]
pub struct Closure {
    /// Parameter names, prefix already stripped
    pub params: Arc<Vec<String>>,

    /// The body expression
    pub body: Value,

    scope: Scope,
}

#[derive(Clone)]
enum Scope {
    Captured(Environment),
    // Stored in its own scope; the holder supplies it on lookup
    Detached,
}

impl Closure {
    /// Create a closure over `env`.
    pub fn new(params: Vec<String>, body: Value, env: Environment) -> Self {
        Self {
            params: Arc::new(params),
            body,
            scope: Scope::Captured(env),
        }
    }

    /// The captured scope.
    pub fn env(&self) -> Option<&Environment> {
        match &self.scope {
            Scope::Captured(env) => Some(env),
            Scope::Detached => None,
        }
    }

    /// Whether both values come from the same evaluation of a `fn` form.
    pub fn same_function(&self, other: &Closure) -> bool {
        Arc::ptr_eq(&self.params, &other.params)
    }

    /// Bind arguments to parameters in a fresh child of the captured scope.
    ///
    /// Missing arguments bind to `null`; extra arguments are ignored.
    pub fn bind(&self, args: Vec<Value>) -> Result<Environment> {
        let env = self
            .env()
            .ok_or_else(|| EvalError::ValueError("closure is detached from its scope".into()))?;
        let scope = env.child();
        let mut args = args.into_iter();
        for param in self.params.iter() {
            scope.define(param.clone(), args.next().unwrap_or(Value::Null));
        }
        Ok(scope)
    }

    /// A copy for storing into `env`, if `env` is the captured scope.
    pub(crate) fn detach_from(&self, env: &Environment) -> Option<Closure> {
        match &self.scope {
            Scope::Captured(own) if own.ptr_eq(env) => Some(Closure {
                params: self.params.clone(),
                body: self.body.clone(),
                scope: Scope::Detached,
            }),
            _ => None,
        }
    }

    pub(crate) fn is_detached(&self) -> bool {
        matches!(self.scope, Scope::Detached)
    }

    /// Reattach a detached copy to the scope that held it.
    pub(crate) fn attach(&self, env: Environment) -> Closure {
        Closure {
            params: self.params.clone(),
            body: self.body.clone(),
            scope: Scope::Captured(env),
        }
    }
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// A shared pending computation.
///
/// Cloning shares the same computation; it runs at most once and every
/// awaiter observes the same result.
#[derive(Clone)]
pub struct Deferred {
    inner: Shared<BoxFuture<'static, Result<Value>>>,
}

impl Deferred {
    /// Wrap a future.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Result<Value>> + Send + 'static,
    {
        Self {
            inner: fut.boxed().shared(),
        }
    }

    /// A computation that has already produced `value`.
    pub fn resolved(value: Value) -> Self {
        Self::new(future::ready(Ok(value)))
    }

    /// A computation that has already failed with `error`.
    pub fn rejected(error: EvalError) -> Self {
        Self::new(future::ready(Err(error)))
    }

    /// Wait for the computation to finish.
    pub async fn resolve(&self) -> Result<Value> {
        self.inner.clone().await
    }

    /// The result, if the computation has already finished.
    pub fn peek(&self) -> Option<&Result<Value>> {
        self.inner.peek()
    }

    /// Whether two handles share one computation.
    pub fn ptr_eq(&self, other: &Deferred) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.peek() {
            Some(Ok(value)) => write!(f, "Deferred({:?})", value),
            Some(Err(err)) => write!(f, "Deferred(<error: {}>)", err),
            None => write!(f, "Deferred(<pending>)"),
        }
    }
}

//! Stack growth for deeply nested evaluation
//!
//! Every nesting level polls several boxed futures inside each other, so a
//! deep expression can exhaust a small thread stack (2 MiB for test threads
//! and tokio workers) long before the depth limit is reached. Each nested
//! evaluation is polled through [`StackGuarded`], which moves onto a fresh
//! stack segment when the current one runs low.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;

/// Minimum stack space to keep available (128KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 128 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_SEGMENT, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// A future whose every poll runs with enough stack.
///
/// The wrapped future's state lives on the heap, so a poll that ran on a
/// grown segment leaves nothing behind on it when it returns.
pub(crate) struct StackGuarded<'a, T> {
    inner: BoxFuture<'a, T>,
}

impl<'a, T> StackGuarded<'a, T> {
    pub(crate) fn new(inner: BoxFuture<'a, T>) -> Self {
        Self { inner }
    }
}

impl<T> Future for StackGuarded<'_, T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let inner = &mut self.inner;
        ensure_sufficient_stack(|| inner.as_mut().poll(cx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::FutureExt;

    fn nest(n: usize) -> BoxFuture<'static, usize> {
        StackGuarded::new(
            async move {
                if n == 0 {
                    0
                } else {
                    nest(n - 1).await + 1
                }
            }
            .boxed(),
        )
        .boxed()
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = futures::executor::block_on(nest(10_000));
        assert_eq!(depth, 10_000);
    }

    #[test]
    fn test_ensure_sufficient_stack_returns_value() {
        assert_eq!(ensure_sufficient_stack(|| 42), 42);
    }
}

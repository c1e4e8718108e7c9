//! Scope frames linked by parent pointer

use std::sync::Arc;

use dashmap::DashMap;

use crate::value::Value;

/// One scope's bindings plus a shared pointer to the enclosing scope.
///
/// Frames are only ever shared, never copied: a child holds its parent
/// alive, and so does any closure that captured it.
#[derive(Default)]
pub(super) struct Frame {
    pub(super) bindings: DashMap<String, Value>,
    pub(super) parent: Option<Arc<Frame>>,
    pub(super) depth: usize,
}

impl Frame {
    pub(super) fn child_of(parent: &Arc<Frame>) -> Self {
        Self {
            bindings: DashMap::new(),
            parent: Some(parent.clone()),
            depth: parent.depth + 1,
        }
    }
}

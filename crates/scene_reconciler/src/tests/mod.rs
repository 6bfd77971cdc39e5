//! Crate-level behavior tests driven through [`SceneRenderer`]

mod lights;
mod render;
mod scene_graph;

use crate::element::RefCallback;
use crate::native::ObjectId;
use std::cell::RefCell;
use std::rc::Rc;

/// Ref callback that records every call
#[derive(Clone)]
pub(crate) struct RefLog {
    calls: Rc<RefCell<Vec<Option<ObjectId>>>>,
    callback: RefCallback,
}

impl RefLog {
    pub(crate) fn new() -> Self {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let callback = RefCallback::new(move |instance| sink.borrow_mut().push(instance));
        Self { calls, callback }
    }

    /// Same callback every time, so re-renders see an unchanged ref
    pub(crate) fn callback(&self) -> RefCallback {
        self.callback.clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Argument of the latest call
    pub(crate) fn last(&self) -> Option<Option<ObjectId>> {
        self.calls.borrow().last().copied()
    }

    /// Latest instance the ref was handed
    pub(crate) fn current(&self) -> Option<ObjectId> {
        self.last().flatten()
    }
}

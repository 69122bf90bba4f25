use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Liveness and change notification for a flow owned by a view.
///
/// Once deactivated, completions of requests still in flight must leave the
/// flow untouched.
pub struct FlowLifecycle {
    active: Cell<bool>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl FlowLifecycle {
    pub fn new() -> Self {
        Self {
            active: Cell::new(true),
            on_change: RefCell::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn deactivate(&self) {
        self.active.set(false);
        self.on_change.borrow_mut().take();
    }

    pub fn set_on_change(&self, on_change: Rc<dyn Fn()>) {
        *self.on_change.borrow_mut() = Some(on_change);
    }

    /// Tell the owning view that state changed
    pub fn changed(&self) {
        let on_change = self.on_change.borrow().clone();
        if let Some(on_change) = on_change {
            on_change();
        }
    }
}

impl Default for FlowLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

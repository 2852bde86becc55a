//! Handles returned by hook primitives.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::store::{UpdateQueue, UpdateRequests};

// =============================================================================
// SetState
// =============================================================================

/// Setter returned by [`Hooks::use_state`](crate::Hooks::use_state).
///
/// Calling it queues an action on the hook and schedules a new render pass
/// rooted at the current tree. Calls made before that pass runs accumulate
/// and are applied in call order.
///
/// # Example
///
/// ```ignore
/// let (count, set_count) = hooks.use_state(0);
/// set_count.update(|c| c + 1);
/// set_count.update(|c| c + 1);
/// // next render sees count + 2
/// ```
pub struct SetState<T> {
    queue: Rc<UpdateQueue<T>>,
    requests: Weak<UpdateRequests>,
}

impl<T: 'static> SetState<T> {
    pub(crate) fn new(queue: Rc<UpdateQueue<T>>, requests: Weak<UpdateRequests>) -> Self {
        Self { queue, requests }
    }

    /// Queue a pure `state -> state` transform.
    pub fn update(&self, action: impl Fn(T) -> T + 'static) {
        self.queue.push(Rc::new(action));
        self.schedule();
    }

    /// Queue a replacement value.
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        self.update(move |_| value.clone());
    }

    fn schedule(&self) {
        match self.requests.upgrade() {
            Some(requests) => requests.request(),
            None => tracing::trace!("state update after engine was dropped"),
        }
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
            requests: Weak::clone(&self.requests),
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("queued", &self.queue.len())
            .finish()
    }
}

// =============================================================================
// RefObject
// =============================================================================

/// Stable single-slot container returned by [`Hooks::use_ref`](crate::Hooks::use_ref).
///
/// The same cell is handed out on every render of the hook. Writing to it
/// does not schedule a render.
pub struct RefObject<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> RefObject<T> {
    pub(crate) fn new(cell: Rc<RefCell<T>>) -> Self {
        Self { cell }
    }

    /// Copy out the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    /// Replace the value, returning the old one.
    pub fn set(&self, value: T) -> T {
        self.cell.replace(value)
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.cell.borrow_mut())
    }

    /// Check if both handles name the same cell.
    pub fn ptr_eq(&self, other: &RefObject<T>) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T> Clone for RefObject<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RefObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefObject").field(&self.cell.borrow()).finish()
    }
}

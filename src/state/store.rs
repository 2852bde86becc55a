//! Hook records - the persistent per-fiber store behind the hook primitives.
//!
//! Records are indexed by call order only. A state hook's action queue is
//! shared by every generation of the same hook position, so a setter
//! captured in an old render still reaches the live hook.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Primitive kind of a hook record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    State,
    Effect,
    Ref,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::State => f.write_str("state"),
            HookKind::Effect => f.write_str("effect"),
            HookKind::Ref => f.write_str("ref"),
        }
    }
}

/// Effect callback queued during render, run after commit.
pub(crate) type PendingEffect = Box<dyn FnOnce()>;

/// Pure `state -> state` transform queued by a setter.
pub(crate) type Action<T> = Rc<dyn Fn(T) -> T>;

// =============================================================================
// Update Queue
// =============================================================================

/// Actions queued for one state hook position.
///
/// Actions are applied when the hook renders and retired only when that
/// render commits. A discarded work-in-progress pass therefore re-applies
/// the same actions on its restart instead of losing them.
pub(crate) struct UpdateQueue<T> {
    actions: RefCell<Vec<Action<T>>>,
}

impl<T> UpdateQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            actions: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, action: Action<T>) {
        self.actions.borrow_mut().push(action);
    }

    /// Apply every queued action in order. Returns the new state and how
    /// many actions it consumed.
    pub(crate) fn apply_pending(&self, seed: T) -> (T, usize) {
        // Snapshot first: an action is free to enqueue more while running.
        let actions: Vec<Action<T>> = self.actions.borrow().clone();
        let state = actions.iter().fold(seed, |state, action| action(state));
        (state, actions.len())
    }

    pub(crate) fn len(&self) -> usize {
        self.actions.borrow().len()
    }
}

/// Type-erased retirement of consumed actions, run at commit.
pub(crate) trait RetireActions {
    fn retire(&self, count: usize);
}

impl<T> RetireActions for UpdateQueue<T> {
    fn retire(&self, count: usize) {
        let mut actions = self.actions.borrow_mut();
        let count = count.min(actions.len());
        actions.drain(..count);
    }
}

// =============================================================================
// Hook Record
// =============================================================================

/// One hook slot on a fiber.
pub(crate) enum HookRecord {
    State {
        /// Current value, a `T`.
        value: Rc<dyn Any>,
        /// The shared `UpdateQueue<T>`.
        queue: Rc<dyn Any>,
        /// Same queue, erased for commit-time retirement.
        retire: Rc<dyn RetireActions>,
        /// Actions folded into `value` by this render.
        consumed: usize,
        type_name: &'static str,
    },
    Effect {
        /// Dependencies recorded by this render, a `D`.
        deps: Option<Rc<dyn Any>>,
    },
    Ref {
        /// The stable `RefCell<T>`.
        cell: Rc<dyn Any>,
        type_name: &'static str,
    },
}

impl HookRecord {
    pub(crate) fn kind(&self) -> HookKind {
        match self {
            HookRecord::State { .. } => HookKind::State,
            HookRecord::Effect { .. } => HookKind::Effect,
            HookRecord::Ref { .. } => HookKind::Ref,
        }
    }

    /// Value type name for state and ref hooks.
    pub(crate) fn type_name(&self) -> Option<&'static str> {
        match self {
            HookRecord::State { type_name, .. } | HookRecord::Ref { type_name, .. } => {
                Some(*type_name)
            }
            HookRecord::Effect { .. } => None,
        }
    }

    /// Drop the actions this record's render consumed. Called once, at commit.
    pub(crate) fn retire_consumed(&mut self) {
        if let HookRecord::State { retire, consumed, .. } = self {
            if *consumed > 0 {
                retire.retire(*consumed);
                *consumed = 0;
            }
        }
    }
}

impl fmt::Debug for HookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookRecord::State { consumed, type_name, .. } => f
                .debug_struct("State")
                .field("type", type_name)
                .field("consumed", consumed)
                .finish(),
            HookRecord::Effect { deps } => f
                .debug_struct("Effect")
                .field("has_deps", &deps.is_some())
                .finish(),
            HookRecord::Ref { type_name, .. } => {
                f.debug_struct("Ref").field("type", type_name).finish()
            }
        }
    }
}

// =============================================================================
// Update Requests
// =============================================================================

/// Flag shared between the engine and every setter it hands out.
///
/// A setter raises it; the work loop observes it before each unit of work
/// and restarts the pass from the current root.
#[derive(Debug, Default)]
pub(crate) struct UpdateRequests {
    pending: Cell<bool>,
    total: Cell<u64>,
}

impl UpdateRequests {
    pub(crate) fn request(&self) {
        self.pending.set(true);
        self.total.set(self.total.get() + 1);
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub(crate) fn clear(&self) {
        self.pending.set(false);
    }

    /// Setter calls since the engine was created.
    pub(crate) fn total(&self) -> u64 {
        self.total.get()
    }
}

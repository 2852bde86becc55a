//! Hooks - the per-expansion context handed to component functions.
//!
//! The scheduler builds one `Hooks` for each component fiber it expands and
//! passes it to the component. Every primitive call takes the next index;
//! the record at that index in the alternate fiber (if any) seeds the new
//! one. There is no other notion of hook identity.
//!
//! # Call-order contract
//!
//! A component must call the same primitives, in the same order and the
//! same number of times, on every render of the same position. Drift is
//! detected: the primitive kind and value type are checked per index and
//! the count is checked once the component returns. With strict hooks the
//! pass is aborted; otherwise the drifting hook is reseeded and a warning
//! is logged.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::handles::{RefObject, SetState};
use super::store::{HookKind, HookRecord, PendingEffect, UpdateQueue, UpdateRequests};
use crate::error::HookError;

/// Hook context for one component invocation.
pub struct Hooks<'a> {
    component: &'static str,
    previous: &'a [HookRecord],
    has_alternate: bool,
    records: Vec<HookRecord>,
    effects: Vec<PendingEffect>,
    requests: Weak<UpdateRequests>,
    strict: bool,
    error: Option<HookError>,
}

/// Hook records and queued effects produced by one component invocation.
pub(crate) struct HookOutput {
    pub(crate) records: Vec<HookRecord>,
    pub(crate) effects: Vec<PendingEffect>,
}

impl<'a> Hooks<'a> {
    /// `previous` is the alternate fiber's records; `None` for a fresh placement.
    pub(crate) fn new(
        component: &'static str,
        previous: Option<&'a [HookRecord]>,
        requests: Weak<UpdateRequests>,
        strict: bool,
    ) -> Self {
        Self {
            component,
            previous: previous.unwrap_or(&[]),
            has_alternate: previous.is_some(),
            records: Vec::with_capacity(previous.map_or(0, <[HookRecord]>::len)),
            effects: Vec::new(),
            requests,
            strict,
            error: None,
        }
    }

    /// Index the next primitive call will occupy.
    pub fn index(&self) -> usize {
        self.records.len()
    }

    /// Name of the component being rendered.
    pub fn component(&self) -> &'static str {
        self.component
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Persistent local state.
    ///
    /// Seeds from the alternate's value at this index (or `initial` on first
    /// render), then applies every action queued since, in order.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        let index = self.index();
        let previous = self.previous;

        let carried = match previous.get(index) {
            Some(HookRecord::State { value, queue, .. }) => {
                match (value.downcast_ref::<T>(), Rc::clone(queue).downcast::<UpdateQueue<T>>()) {
                    (Some(value), Ok(queue)) => Some((value.clone(), queue)),
                    _ => {
                        self.type_drift::<T>(index, HookKind::State);
                        None
                    }
                }
            }
            Some(_) => {
                self.shape_drift(index, HookKind::State);
                None
            }
            None => None,
        };
        let (seed, queue) = carried.unwrap_or_else(|| (initial, Rc::new(UpdateQueue::new())));

        let (state, consumed) = queue.apply_pending(seed);

        self.records.push(HookRecord::State {
            value: Rc::new(state.clone()),
            queue: queue.clone(),
            retire: queue.clone(),
            consumed,
            type_name: type_name::<T>(),
        });

        (state, SetState::new(queue, self.requests.clone()))
    }

    // =========================================================================
    // Effect
    // =========================================================================

    /// Run `callback` after the commit of this render, if `deps` changed.
    ///
    /// Changed means: `deps` is `None`, this is the first render of the hook,
    /// the previous deps were `None` or of another type, or they compare
    /// unequal. Tuples and `Vec`s compare element by element.
    pub fn use_effect<D, F>(&mut self, callback: F, deps: Option<D>)
    where
        D: PartialEq + 'static,
        F: FnOnce() + 'static,
    {
        let index = self.index();

        let previous = self.previous;
        let previous_deps: Option<Option<Rc<dyn Any>>> = match previous.get(index) {
            Some(HookRecord::Effect { deps }) => Some(deps.clone()),
            Some(_) => {
                self.shape_drift(index, HookKind::Effect);
                None
            }
            None => None,
        };

        let changed = match (&deps, previous_deps) {
            (None, _) | (Some(_), None) | (Some(_), Some(None)) => true,
            (Some(new), Some(Some(old))) => old.downcast_ref::<D>().is_none_or(|old| old != new),
        };

        if changed {
            self.effects.push(Box::new(callback));
        }

        self.records.push(HookRecord::Effect {
            deps: deps.map(|deps| Rc::new(deps) as Rc<dyn Any>),
        });
    }

    // =========================================================================
    // Ref
    // =========================================================================

    /// A cell that stays the same across renders. `initial` is used once.
    pub fn use_ref<T: 'static>(&mut self, initial: T) -> RefObject<T> {
        let index = self.index();

        let previous = self.previous;
        let carried = match previous.get(index) {
            Some(HookRecord::Ref { cell, .. }) => match Rc::clone(cell).downcast::<RefCell<T>>() {
                Ok(cell) => Some(cell),
                Err(_) => {
                    self.type_drift::<T>(index, HookKind::Ref);
                    None
                }
            },
            Some(_) => {
                self.shape_drift(index, HookKind::Ref);
                None
            }
            None => None,
        };
        let cell = carried.unwrap_or_else(|| Rc::new(RefCell::new(initial)));

        self.records.push(HookRecord::Ref {
            cell: cell.clone(),
            type_name: type_name::<T>(),
        });

        RefObject::new(cell)
    }

    // =========================================================================
    // Drift detection
    // =========================================================================

    fn shape_drift(&mut self, index: usize, expected: HookKind) {
        if let Some(found) = self.previous.get(index).map(HookRecord::kind) {
            self.report(HookError::ShapeMismatch { index, expected, found });
        }
    }

    fn type_drift<T>(&mut self, index: usize, kind: HookKind) {
        let found = self
            .previous
            .get(index)
            .and_then(HookRecord::type_name)
            .unwrap_or("?");
        self.report(HookError::TypeMismatch {
            index,
            kind,
            expected: type_name::<T>(),
            found,
        });
    }

    fn report(&mut self, error: HookError) {
        if self.strict {
            // Keep the first violation; later ones are usually fallout.
            self.error.get_or_insert(error);
        } else {
            tracing::warn!(
                component = self.component,
                %error,
                "hook reseeded after call-order drift"
            );
        }
    }

    /// Finish the invocation: check the hook count and hand back the records.
    pub(crate) fn finish(mut self) -> Result<HookOutput, HookError> {
        if self.has_alternate && self.previous.len() != self.records.len() {
            self.report(HookError::CountMismatch {
                previous: self.previous.len(),
                current: self.records.len(),
            });
        }

        match self.error {
            Some(error) => Err(error),
            None => Ok(HookOutput {
                records: self.records,
                effects: self.effects,
            }),
        }
    }
}

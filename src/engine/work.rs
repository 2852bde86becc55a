//! Unit of work - expand exactly one fiber.
//!
//! - Component fibers run the component with a fresh [`Hooks`] context and
//!   reconcile the single node it returns.
//! - Host and text fibers get their host node created on first visit, then
//!   reconcile their `children`.
//! - The root reconciles its `children` (the rendered node).

use std::rc::{Rc, Weak};
use std::slice;

use crate::error::EngineError;
use crate::renderer::HostRenderer;
use crate::state::{Hooks, UpdateRequests};
use crate::types::{FiberId, NodeType};

use super::fiber::FiberTree;
use super::reconcile::reconcile_children;

/// Everything one expansion step may touch.
pub(crate) struct UnitOfWork<'a, R: HostRenderer> {
    pub(crate) host: &'a mut R,
    pub(crate) wip: &'a mut FiberTree<R::Handle>,
    pub(crate) current: Option<&'a mut FiberTree<R::Handle>>,
    pub(crate) deletions: &'a mut Vec<FiberId>,
    pub(crate) requests: Weak<UpdateRequests>,
    pub(crate) strict_hooks: bool,
}

impl<R: HostRenderer> UnitOfWork<'_, R> {
    /// Expand `id` and return the next fiber to visit.
    pub(crate) fn perform(mut self, id: FiberId) -> Result<Option<FiberId>, EngineError> {
        let kind = self.wip[id].kind.clone();
        let props = Rc::clone(&self.wip[id].props);

        tracing::trace!(fiber = id.index(), kind = kind.name(), "unit of work");

        match &kind {
            NodeType::Component(component) => {
                let previous = match (self.wip[id].alternate, self.current.as_deref()) {
                    (Some(alternate), Some(current)) => Some(current[alternate].hooks.as_slice()),
                    _ => None,
                };

                let mut hooks = Hooks::new(
                    component.name(),
                    previous,
                    Weak::clone(&self.requests),
                    self.strict_hooks,
                );
                let child = component.render(&props, &mut hooks);
                let output = hooks.finish().map_err(|source| EngineError::Hook {
                    component: component.name(),
                    source,
                })?;

                let fiber = &mut self.wip[id];
                fiber.hooks = output.records;
                fiber.pending_effects = output.effects;

                self.reconcile(id, slice::from_ref(&child));
            }
            NodeType::Host(_) | NodeType::Text => {
                if self.wip[id].host.is_none() {
                    let handle = self.host.create_host_node(&kind, &props)?;
                    self.wip[id].host = Some(handle);
                }
                self.reconcile(id, props.children());
            }
            NodeType::Root => self.reconcile(id, props.children()),
        }

        Ok(self.wip.next_unit(id))
    }

    fn reconcile(&mut self, id: FiberId, elements: &[crate::primitives::Node]) {
        reconcile_children(
            self.wip,
            self.current.as_deref_mut(),
            id,
            elements,
            self.deletions,
        );
    }
}

//! Fiber arena - one generation of the fiber tree.
//!
//! Fibers are records in a `Vec`, linked by [`FiberId`] indices. The
//! `parent`/`child`/`sibling` edges stay inside one arena; `alternate` points
//! into the previous generation's arena.
//!
//! ```text
//! generation 3 (current)            generation 4 (work in progress)
//! #0 Root ──child──► #1 div         #0 Root ──child──► #1 div
//!                      │                     ▲            │
//!                    child           alternate=#0       child
//!                      ▼                                  ▼
//!                    #2 text ◄──────── alternate ────── #2 text
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use crate::primitives::Props;
use crate::state::{HookRecord, PendingEffect};
use crate::types::{EffectTag, FiberId, NodeType};

// =============================================================================
// Fiber
// =============================================================================

/// One rendered position in one generation.
pub struct Fiber<H> {
    pub(crate) kind: NodeType,
    pub(crate) props: Rc<Props>,
    pub(crate) host: Option<H>,
    pub(crate) parent: Option<FiberId>,
    pub(crate) child: Option<FiberId>,
    pub(crate) sibling: Option<FiberId>,
    pub(crate) alternate: Option<FiberId>,
    pub(crate) effect_tag: EffectTag,
    pub(crate) hooks: Vec<HookRecord>,
    pub(crate) pending_effects: Vec<PendingEffect>,
}

impl<H> Fiber<H> {
    pub(crate) fn new(kind: NodeType, props: Rc<Props>, parent: Option<FiberId>) -> Self {
        Self {
            kind,
            props,
            host: None,
            parent,
            child: None,
            sibling: None,
            alternate: None,
            effect_tag: EffectTag::None,
            hooks: Vec::new(),
            pending_effects: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeType {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Host node owned by this position, if it has been created.
    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    pub fn child(&self) -> Option<FiberId> {
        self.child
    }

    pub fn sibling(&self) -> Option<FiberId> {
        self.sibling
    }

    /// Same position in the previous generation's arena.
    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    pub fn effect_tag(&self) -> EffectTag {
        self.effect_tag
    }

    /// Number of hook records this fiber's component registered.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }
}

impl<H: fmt::Debug> fmt::Debug for Fiber<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fiber")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("parent", &self.parent)
            .field("child", &self.child)
            .field("sibling", &self.sibling)
            .field("alternate", &self.alternate)
            .field("effect_tag", &self.effect_tag)
            .field("hooks", &self.hooks)
            .field("pending_effects", &self.pending_effects.len())
            .finish()
    }
}

// =============================================================================
// Fiber Tree
// =============================================================================

/// Arena holding every fiber of one generation. Index 0 is the root.
pub struct FiberTree<H> {
    generation: u64,
    fibers: Vec<Fiber<H>>,
}

impl<H> FiberTree<H> {
    /// Start a generation with its root fiber.
    ///
    /// `container` is the host node the tree renders into. `alternate` is
    /// `Some(FiberId::ROOT)` when a committed generation exists.
    pub(crate) fn with_root(
        generation: u64,
        container: H,
        props: Rc<Props>,
        alternate: Option<FiberId>,
    ) -> Self {
        let mut root = Fiber::new(NodeType::Root, props, None);
        root.host = Some(container);
        root.alternate = alternate;
        Self {
            generation,
            fibers: vec![root],
        }
    }

    pub(crate) fn alloc(&mut self, fiber: Fiber<H>) -> FiberId {
        let id = FiberId(self.fibers.len());
        self.fibers.push(fiber);
        id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn root(&self) -> &Fiber<H> {
        &self[FiberId::ROOT]
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber<H>> {
        self.fibers.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Direct children of `id`, first to last.
    pub fn children(&self, id: FiberId) -> impl Iterator<Item = FiberId> + '_ {
        std::iter::successors(self.get(id).and_then(|fiber| fiber.child), move |&child| {
            self.get(child).and_then(|fiber| fiber.sibling)
        })
    }

    /// Depth-first pre-order from `start`, `start` included, siblings of
    /// `start` excluded.
    pub fn preorder(&self, start: FiberId) -> Vec<FiberId> {
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            let Some(fiber) = self.get(id) else { continue };
            order.push(id);
            if id != start {
                if let Some(sibling) = fiber.sibling {
                    stack.push(sibling);
                }
            }
            if let Some(child) = fiber.child {
                stack.push(child);
            }
        }

        order
    }

    /// Nearest strict ancestor of `id` that holds a host node.
    pub fn host_parent(&self, id: FiberId) -> Option<&H> {
        let mut cursor = self.get(id)?.parent;
        while let Some(parent) = cursor {
            let fiber = self.get(parent)?;
            if let Some(host) = &fiber.host {
                return Some(host);
            }
            cursor = fiber.parent;
        }
        None
    }

    /// First host node at or below `id`, following first children only.
    pub fn first_host(&self, id: FiberId) -> Option<&H> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if let Some(host) = &fiber.host {
                return Some(host);
            }
            cursor = fiber.child;
        }
        None
    }

    /// Next fiber in depth-first order after `id`: first child, else the
    /// nearest sibling found walking up the parents.
    pub fn next_unit(&self, id: FiberId) -> Option<FiberId> {
        let fiber = self.get(id)?;
        if fiber.child.is_some() {
            return fiber.child;
        }

        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current)?;
            if fiber.sibling.is_some() {
                return fiber.sibling;
            }
            cursor = fiber.parent;
        }
        None
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fiber<H>> {
        self.fibers.iter_mut()
    }
}

impl<H> Index<FiberId> for FiberTree<H> {
    type Output = Fiber<H>;

    fn index(&self, id: FiberId) -> &Fiber<H> {
        &self.fibers[id.0]
    }
}

impl<H> IndexMut<FiberId> for FiberTree<H> {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber<H> {
        &mut self.fibers[id.0]
    }
}

impl<H: fmt::Debug> fmt::Debug for FiberTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiberTree")
            .field("generation", &self.generation)
            .field("fibers", &self.fibers)
            .finish()
    }
}

//! Core types shared by the node model, the fiber engine and the renderers.

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use crate::primitives::{Node, Props};
use crate::state::Hooks;

/// Reserved type name for text nodes.
pub const TEXT_TYPE: &str = "text";

/// Reserved prop name holding a node's children.
pub const CHILDREN_PROP: &str = "children";

/// Prop holding a text node's content.
pub const TEXT_VALUE_PROP: &str = "value";

// =============================================================================
// Fiber Id
// =============================================================================

/// Index of a fiber inside one generation's [`FiberTree`](crate::FiberTree).
///
/// Ids are only meaningful for the arena that minted them. A fiber's
/// `alternate` is a `FiberId` into the previous generation's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(pub(crate) usize);

impl FiberId {
    /// The root fiber of every generation.
    pub const ROOT: FiberId = FiberId(0);

    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// Effect Tag
// =============================================================================

/// Per-fiber marker decided by the reconciler and consumed by the commit.
///
/// Exactly one tag is set per fiber per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTag {
    /// Nothing to apply (the root fiber, or a deletion mark undone when its pass was discarded).
    #[default]
    None,
    /// Attach a freshly created host node.
    Placement,
    /// Reuse the previous host node and diff its properties.
    Update,
    /// Detach the previous host node. Set on prior-generation fibers only.
    Deletion,
}

// =============================================================================
// Component Reference
// =============================================================================

/// Signature of a component function.
pub type RenderFn = dyn Fn(&Props, &mut Hooks<'_>) -> Node;

/// A component function together with its identity.
///
/// Identity is the Rust type of the function, so every `fn` item and every
/// closure literal is its own component type. Two `ComponentRef`s built from
/// the same function compare equal even when created separately.
#[derive(Clone)]
pub struct ComponentRef {
    id: TypeId,
    name: &'static str,
    render: Rc<RenderFn>,
}

impl ComponentRef {
    /// Wrap a component function.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Props, &mut Hooks<'_>) -> Node + 'static,
    {
        Self {
            id: TypeId::of::<F>(),
            name: short_type_name(std::any::type_name::<F>()),
            render: Rc::new(render),
        }
    }

    /// Last path segment of the function's type name (for logs and errors).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the component.
    pub fn render(&self, props: &Props, hooks: &mut Hooks<'_>) -> Node {
        (self.render)(props, hooks)
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentRef {}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentRef").field(&self.name).finish()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    // Generic arguments can contain `::`, so cut them off first.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// =============================================================================
// Node Type
// =============================================================================

/// What a node (and the fiber it produces) is.
#[derive(Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The container fiber at the top of every generation.
    Root,
    /// A host element identified by tag name.
    Host(Rc<str>),
    /// A text leaf carrying a `value` prop.
    Text,
    /// A component function.
    Component(ComponentRef),
}

impl NodeType {
    /// Host elements and text leaves own a host node; components and the root don't create one.
    pub fn is_host(&self) -> bool {
        matches!(self, NodeType::Host(_) | NodeType::Text)
    }

    /// Check if this is a component function.
    pub fn is_component(&self) -> bool {
        matches!(self, NodeType::Component(_))
    }

    /// Display name: tag, `text`, component name or `root`.
    pub fn name(&self) -> &str {
        match self {
            NodeType::Root => "root",
            NodeType::Host(tag) => tag,
            NodeType::Text => TEXT_TYPE,
            NodeType::Component(component) => component.name(),
        }
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Root => f.write_str("Root"),
            NodeType::Host(tag) => write!(f, "Host({tag})"),
            NodeType::Text => f.write_str("Text"),
            NodeType::Component(component) => write!(f, "Component({})", component.name()),
        }
    }
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        if tag == TEXT_TYPE {
            NodeType::Text
        } else {
            NodeType::Host(Rc::from(tag))
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::from(tag.as_str())
    }
}

impl From<ComponentRef> for NodeType {
    fn from(component: ComponentRef) -> Self {
        NodeType::Component(component)
    }
}

// =============================================================================
// Text Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes painted by the terminal renderer.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

impl Attr {
    /// Boolean host property that switches each attribute on.
    pub const PROPERTY_NAMES: [(Attr, &'static str); 8] = [
        (Attr::BOLD, "bold"),
        (Attr::DIM, "dim"),
        (Attr::ITALIC, "italic"),
        (Attr::UNDERLINE, "underline"),
        (Attr::BLINK, "blink"),
        (Attr::INVERSE, "inverse"),
        (Attr::HIDDEN, "hidden"),
        (Attr::STRIKETHROUGH, "strikethrough"),
    ];
}

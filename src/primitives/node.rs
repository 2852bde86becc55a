//! Node - immutable UI description produced fresh on every render.
//!
//! Nodes are cheap to clone (an `Rc` around the props) and never change
//! after construction. Plain text children are coerced into `text` nodes
//! carrying a `value` prop.

use std::fmt;
use std::rc::Rc;

use super::types::{EventHandler, HostEvent, PropValue, Props};
use crate::state::Hooks;
use crate::types::{ComponentRef, NodeType, TEXT_VALUE_PROP};

/// Immutable description of one UI element.
#[derive(Clone)]
pub struct Node {
    kind: NodeType,
    props: Rc<Props>,
}

impl Node {
    pub fn new(kind: NodeType, props: Props) -> Self {
        Self {
            kind,
            props: Rc::new(props),
        }
    }

    pub fn kind(&self) -> &NodeType {
        &self.kind
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Shared handle to the props, for fibers that keep them past this node.
    pub(crate) fn props_rc(&self) -> Rc<Props> {
        Rc::clone(&self.props)
    }

    pub fn children(&self) -> &[Node] {
        self.props.children()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.props, &other.props)
            || (self.kind == other.kind && self.props == other.props)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("props", &self.props)
            .finish()
    }
}

// =============================================================================
// Child coercion
// =============================================================================

/// Anything accepted as a child: a node, or content coerced into a text node.
#[derive(Debug, Clone)]
pub enum Child {
    Node(Node),
    Text(String),
}

impl Child {
    fn into_node(self) -> Node {
        match self {
            Child::Node(node) => node,
            Child::Text(value) => text(value),
        }
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<NodeBuilder> for Child {
    fn from(builder: NodeBuilder) -> Self {
        Child::Node(builder.build())
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<i32> for Child {
    fn from(value: i32) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Child::Text(value.to_string())
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Build a node from a type, props and children.
///
/// Children that are not nodes become `text` nodes. Any children already
/// present in `props` are replaced.
///
/// # Example
///
/// ```ignore
/// let node = create_element("div", Props::new().with("id", "foo"), [
///     Child::from(create_element("a", Props::new(), ["bar".into()])),
///     Child::from(create_element("b", Props::new(), [])),
/// ]);
/// ```
pub fn create_element<I>(kind: impl Into<NodeType>, props: Props, children: I) -> Node
where
    I: IntoIterator<Item = Child>,
{
    let children = children.into_iter().map(Child::into_node).collect();
    Node::new(kind.into(), props.with_children(children))
}

/// A text leaf with `value` set to the displayed content.
pub fn text(value: impl fmt::Display) -> Node {
    Node::new(
        NodeType::Text,
        Props::new().with(TEXT_VALUE_PROP, value.to_string()),
    )
}

/// A component node. The component receives `props` on every render.
pub fn component<F>(render: F, props: Props) -> Node
where
    F: Fn(&Props, &mut Hooks<'_>) -> Node + 'static,
{
    Node::new(NodeType::Component(ComponentRef::new(render)), props)
}

/// Start building a host element.
///
/// ```ignore
/// let node = element("h1")
///     .on("onClick", move |_| set_count.update(|c| c + 1))
///     .child(format!("Count: {count}"))
///     .build();
/// ```
pub fn element(tag: &str) -> NodeBuilder {
    NodeBuilder {
        kind: NodeType::from(tag),
        props: Props::new(),
        children: Vec::new(),
    }
}

/// Fluent builder returned by [`element`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    kind: NodeType,
    props: Props,
    children: Vec<Node>,
}

impl NodeBuilder {
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    /// Bind a handler under an event prop such as `onClick`.
    pub fn on(mut self, prop: impl Into<String>, handler: impl Fn(&HostEvent) + 'static) -> Self {
        self.props.insert(prop, EventHandler::new(handler));
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into().into_node());
        self
    }

    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.children
            .extend(children.into_iter().map(|child| child.into().into_node()));
        self
    }

    pub fn build(self) -> Node {
        Node::new(self.kind, self.props.with_children(self.children))
    }
}

impl From<NodeBuilder> for Node {
    fn from(builder: NodeBuilder) -> Self {
        builder.build()
    }
}

//! HostTree - an in-memory host: elements with attributes and listeners,
//! text leaves, and a log of every call the engine made.
//!
//! Built for tests, demos and inspection, not long-running sessions. Nodes
//! live in an arena indexed by [`HostId`] and are never reclaimed: detached
//! nodes, and nodes created by a discarded pass, stay in the arena. The call
//! log also grows until [`HostTree::take_calls`] or
//! [`HostTree::clear_calls`] drains it.
//!
//! # Example
//!
//! ```ignore
//! let mut host = HostTree::new();
//! let container = host.create_container();
//! // ... render and flush through an Engine ...
//! host.dispatch(button, &HostEvent::new("click"));
//! assert_eq!(host.text_content(container), "Count: 1");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use super::HostRenderer;
use crate::config::{EngineConfig, DEFAULT_EVENT_PREFIX};
use crate::error::{ConfigError, HostError};
use crate::primitives::{diff_props, EventHandler, HostEvent, PropChange, PropValue, Props};
use crate::types::{NodeType, TEXT_VALUE_PROP};

// =============================================================================
// Host Node
// =============================================================================

/// Index of a node inside a [`HostTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(usize);

impl HostId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKind {
    /// Mount point created by [`HostTree::create_container`].
    Container,
    Element(String),
    Text,
}

#[derive(Debug, Clone)]
pub struct HostNode {
    kind: HostKind,
    attributes: BTreeMap<String, PropValue>,
    listeners: BTreeMap<String, EventHandler>,
    parent: Option<HostId>,
    children: Vec<HostId>,
}

impl HostNode {
    fn new(kind: HostKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            listeners: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &HostKind {
        &self.kind
    }

    /// Tag name for elements.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            HostKind::Element(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&PropValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn has_listener(&self, event: &str) -> bool {
        self.listeners.contains_key(event)
    }

    pub fn parent(&self) -> Option<HostId> {
        self.parent
    }

    pub fn children(&self) -> &[HostId] {
        &self.children
    }

    /// Text leaf content.
    pub fn text(&self) -> Option<&str> {
        match self.kind {
            HostKind::Text => self.attribute(TEXT_VALUE_PROP).and_then(PropValue::as_str),
            _ => None,
        }
    }
}

// =============================================================================
// Call Log
// =============================================================================

/// One mutation made through the [`HostRenderer`] interface.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create { id: HostId, kind: HostKind },
    Set { id: HostId, name: String, value: PropValue },
    Remove { id: HostId, name: String },
    Bind { id: HostId, event: String },
    Unbind { id: HostId, event: String },
    Attach { parent: HostId, child: HostId },
    Detach { parent: HostId, child: HostId },
}

impl HostCall {
    /// Changes tree shape rather than a node's properties.
    pub fn is_structural(&self) -> bool {
        matches!(self, HostCall::Attach { .. } | HostCall::Detach { .. })
    }
}

// =============================================================================
// Host Tree
// =============================================================================

/// In-memory host renderer. Storage only grows; see the module docs.
#[derive(Debug, Clone)]
pub struct HostTree {
    nodes: Vec<HostNode>,
    calls: Vec<HostCall>,
    event_prefix: String,
}

impl Default for HostTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HostTree {
    pub fn new() -> Self {
        Self::unchecked(DEFAULT_EVENT_PREFIX.to_string())
    }

    /// Host treating props that start with `prefix` as event bindings.
    pub fn with_event_prefix(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ConfigError::EmptyEventPrefix);
        }
        Ok(Self::unchecked(prefix))
    }

    /// Use the engine config's event prefix.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::unchecked(config.event_prefix.clone()))
    }

    fn unchecked(event_prefix: String) -> Self {
        Self {
            nodes: Vec::new(),
            calls: Vec::new(),
            event_prefix,
        }
    }

    /// New empty mount point. Not logged.
    pub fn create_container(&mut self) -> HostId {
        self.alloc(HostKind::Container)
    }

    fn alloc(&mut self, kind: HostKind) -> HostId {
        let id = HostId(self.nodes.len());
        self.nodes.push(HostNode::new(kind));
        id
    }

    pub fn node(&self, id: HostId) -> Option<&HostNode> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: HostId) -> Result<&mut HostNode, HostError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| HostError::UnknownNode(id.to_string()))
    }

    /// Children of `id`; empty for unknown ids.
    pub fn children(&self, id: HostId) -> &[HostId] {
        self.node(id).map(HostNode::children).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concatenated text of every attached text leaf under `id`, in order.
    pub fn text_content(&self, id: HostId) -> String {
        let mut content = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else { continue };
            if let Some(text) = node.text() {
                content.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        content
    }

    /// First attached element below `root` with tag `tag`, pre-order.
    pub fn find_element(&self, root: HostId, tag: &str) -> Option<HostId> {
        let mut stack = self.children(root).iter().rev().copied().collect::<Vec<_>>();
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            if node.tag() == Some(tag) {
                return Some(current);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Invoke the listener bound for `event.name` on `id`.
    ///
    /// Returns `false` when nothing is bound. Events don't bubble.
    pub fn dispatch(&self, id: HostId, event: &HostEvent) -> bool {
        let handler = self
            .node(id)
            .and_then(|node| node.listeners.get(&event.name))
            .cloned();

        match handler {
            Some(handler) => {
                tracing::trace!(node = %id, event = %event.name, "dispatch");
                handler.call(event);
                true
            }
            None => false,
        }
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn apply_change(&mut self, id: HostId, change: PropChange<'_>) -> Result<(), HostError> {
        let node = self.node_mut(id)?;
        let call = match change {
            PropChange::Remove { name } => {
                node.attributes.remove(name);
                HostCall::Remove { id, name: name.to_string() }
            }
            PropChange::Unbind { event, .. } => {
                node.listeners.remove(&event);
                HostCall::Unbind { id, event }
            }
            PropChange::Set { name, value } => {
                node.attributes.insert(name.to_string(), value.clone());
                HostCall::Set {
                    id,
                    name: name.to_string(),
                    value: value.clone(),
                }
            }
            PropChange::Bind { event, handler } => {
                node.listeners.insert(event.clone(), handler.clone());
                HostCall::Bind { id, event }
            }
        };
        self.calls.push(call);
        Ok(())
    }
}

impl HostRenderer for HostTree {
    type Handle = HostId;

    fn create_host_node(&mut self, kind: &NodeType, props: &Props) -> Result<HostId, HostError> {
        let kind = match kind {
            NodeType::Host(tag) => HostKind::Element(tag.to_string()),
            NodeType::Text => HostKind::Text,
            other => return Err(HostError::UnsupportedType(other.name().to_string())),
        };

        let id = self.alloc(kind.clone());
        self.calls.push(HostCall::Create { id, kind });
        self.apply_property_diff(&id, &Props::new(), props)?;
        Ok(id)
    }

    fn apply_property_diff(
        &mut self,
        node: &HostId,
        old: &Props,
        new: &Props,
    ) -> Result<(), HostError> {
        let prefix = self.event_prefix.clone();
        for change in diff_props(old, new, &prefix) {
            self.apply_change(*node, change)?;
        }
        Ok(())
    }

    fn attach(&mut self, parent: &HostId, child: &HostId) -> Result<(), HostError> {
        let (parent, child) = (*parent, *child);
        self.node_mut(parent)?;

        // A node has one parent: attaching elsewhere moves it.
        if let Some(previous) = self.node_mut(child)?.parent.take() {
            self.node_mut(previous)?.children.retain(|&id| id != child);
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.calls.push(HostCall::Attach { parent, child });
        Ok(())
    }

    fn detach(&mut self, parent: &HostId, child: &HostId) -> Result<(), HostError> {
        let (parent, child) = (*parent, *child);
        let children = &mut self.node_mut(parent)?.children;
        let Some(position) = children.iter().position(|&id| id == child) else {
            return Err(HostError::NotAttached {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        };
        children.remove(position);

        self.node_mut(child)?.parent = None;
        self.calls.push(HostCall::Detach { parent, child });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn element(tag: &str) -> NodeType {
        NodeType::from(tag)
    }

    #[test]
    fn test_create_applies_props() {
        let mut host = HostTree::new();
        let props = Props::new().with("id", "foo").with("onClick", EventHandler::new(|_| {}));
        let id = host.create_host_node(&element("div"), &props).unwrap();

        let node = host.node(id).unwrap();
        assert_eq!(node.tag(), Some("div"));
        assert_eq!(node.attribute("id"), Some(&PropValue::from("foo")));
        assert!(node.has_listener("click"));
        assert!(node.attribute("onClick").is_none());
        assert_eq!(
            host.calls(),
            &[
                HostCall::Create { id, kind: HostKind::Element("div".into()) },
                HostCall::Set { id, name: "id".into(), value: PropValue::from("foo") },
                HostCall::Bind { id, event: "click".into() },
            ]
        );
    }

    #[test]
    fn test_property_diff_order() {
        let mut host = HostTree::new();
        let old = Props::new()
            .with("title", "a")
            .with("hidden", true)
            .with("onClick", EventHandler::new(|_| {}));
        let new = Props::new()
            .with("title", "b")
            .with("onClick", EventHandler::new(|_| {}));
        let id = host.create_host_node(&element("p"), &old).unwrap();
        host.clear_calls();

        host.apply_property_diff(&id, &old, &new).unwrap();
        assert_eq!(
            host.take_calls(),
            vec![
                HostCall::Remove { id, name: "hidden".into() },
                HostCall::Unbind { id, event: "click".into() },
                HostCall::Set { id, name: "title".into(), value: PropValue::from("b") },
                HostCall::Bind { id, event: "click".into() },
            ]
        );
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_attach_detach() {
        let mut host = HostTree::new();
        let root = host.create_container();
        let text = host
            .create_host_node(&NodeType::Text, &Props::new().with("value", "hi"))
            .unwrap();

        host.attach(&root, &text).unwrap();
        assert_eq!(host.children(root), &[text]);
        assert_eq!(host.text_content(root), "hi");

        host.detach(&root, &text).unwrap();
        assert!(host.children(root).is_empty());
        assert!(matches!(
            host.detach(&root, &text),
            Err(HostError::NotAttached { .. })
        ));
    }

    #[test]
    fn test_attach_moves_node() {
        let mut host = HostTree::new();
        let a = host.create_container();
        let b = host.create_container();
        let leaf = host.create_host_node(&element("span"), &Props::new()).unwrap();

        host.attach(&a, &leaf).unwrap();
        host.attach(&b, &leaf).unwrap();
        assert!(host.children(a).is_empty());
        assert_eq!(host.node(leaf).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_unknown_node() {
        let mut host = HostTree::new();
        let root = host.create_container();
        assert!(matches!(
            host.attach(&root, &HostId(99)),
            Err(HostError::UnknownNode(_))
        ));
        assert!(matches!(
            host.create_host_node(&NodeType::Root, &Props::new()),
            Err(HostError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_dispatch_and_find() {
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let mut host = HostTree::with_event_prefix("on").unwrap();
        let root = host.create_container();
        let props = Props::new()
            .with("onClick", EventHandler::new(move |_| counter.set(counter.get() + 1)));
        let button = host.create_host_node(&element("button"), &props).unwrap();
        host.attach(&root, &button).unwrap();

        assert_eq!(host.find_element(root, "button"), Some(button));
        assert!(host.dispatch(button, &HostEvent::new("click")));
        assert!(!host.dispatch(button, &HostEvent::new("keydown")));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_rejects_empty_event_prefix() {
        assert!(matches!(
            HostTree::with_event_prefix(""),
            Err(ConfigError::EmptyEventPrefix)
        ));
        let config = EngineConfig::default().with_event_prefix("");
        assert!(matches!(
            HostTree::from_config(&config),
            Err(ConfigError::EmptyEventPrefix)
        ));
        assert!(HostTree::with_event_prefix("handle").is_ok());
    }
}

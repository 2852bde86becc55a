//! Prop types - values, event handlers and the props map.
//!
//! Props are plain data plus event handlers. Data compares by value,
//! handlers compare by identity (the same `Rc` allocation), so a closure
//! re-created on every render counts as a changed handler.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::primitives::Node;
use crate::types::CHILDREN_PROP;

// =============================================================================
// Event Handler
// =============================================================================

/// Event delivered by a host renderer to a bound handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// Event name without prefix (`click`, `input`, ...).
    pub name: String,
    /// Optional payload (e.g. the new value of an input).
    pub value: Option<PropValue>,
}

impl HostEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<PropValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Event callback bound through an `on*` prop.
///
/// Using Rc<dyn Fn> so the same handler can be shared between the props of
/// a fiber and the host node it is bound to.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&HostEvent)>);

impl EventHandler {
    pub fn new(handler: impl Fn(&HostEvent) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &HostEvent) {
        (self.0)(event)
    }

    /// Check if both handles point at the same closure.
    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// Prop Value
// =============================================================================

/// A single prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Event subscription. Only meaningful under an event-prefixed name.
    Handler(EventHandler),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropValue::Float(n) => Some(*n),
            PropValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(s) => f.write_str(s),
            PropValue::Int(n) => write!(f, "{n}"),
            PropValue::Float(n) => write!(f, "{n}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Handler(_) => f.write_str("[handler]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(i64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        PropValue::Int(i64::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(handler: EventHandler) -> Self {
        PropValue::Handler(handler)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Name → value map plus the ordered `children` sequence.
///
/// `children` is stored apart from the other props so it can never be
/// applied to a host node as a plain property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
    children: Vec<Node>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`Props::set_children`].
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Set a prop, returning the previous value.
    ///
    /// `children` is reserved; use [`Props::set_children`] for it.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropValue>,
    ) -> Option<PropValue> {
        let name = name.into();
        if name == CHILDREN_PROP {
            tracing::warn!("ignoring `children` set as a plain prop");
            return None;
        }
        self.values.insert(name, value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.values.remove(name)
    }

    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropValue::as_str)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropValue::as_int)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropValue::as_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Plain props and handlers in name order (never includes `children`).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of props excluding `children`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

// =============================================================================
// Prop Diff
// =============================================================================

/// One host mutation needed to move a host node from old props to new props.
#[derive(Debug, Clone, PartialEq)]
pub enum PropChange<'a> {
    /// Plain prop absent from the new props.
    Remove { name: &'a str },
    /// Handler gone or replaced.
    Unbind { event: String, handler: &'a EventHandler },
    /// Plain prop added or changed.
    Set { name: &'a str, value: &'a PropValue },
    /// Handler added or replaced.
    Bind { event: String, handler: &'a EventHandler },
}

/// Event name bound by a prop, if the prop is an event binding.
///
/// `onClick` with prefix `on` binds `click`.
pub fn event_name(prop: &str, prefix: &str) -> Option<String> {
    prop.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
        .map(str::to_lowercase)
}

/// Compute the host mutations from `old` to `new`.
///
/// Changes come out grouped in application order: removals, unbinds,
/// sets, binds. An event-prefixed prop that doesn't hold a handler is
/// skipped.
pub fn diff_props<'a>(old: &'a Props, new: &'a Props, event_prefix: &str) -> Vec<PropChange<'a>> {
    let mut removed = Vec::new();
    let mut unbound = Vec::new();
    let mut set = Vec::new();
    let mut bound = Vec::new();

    for (name, old_value) in old.iter() {
        let new_value = new.get(name);
        match event_name(name, event_prefix) {
            Some(event) => {
                if new_value != Some(old_value) {
                    if let Some(handler) = old_value.as_handler() {
                        unbound.push(PropChange::Unbind { event, handler });
                    }
                }
            }
            None => {
                if new_value.is_none() {
                    removed.push(PropChange::Remove { name });
                }
            }
        }
    }

    for (name, new_value) in new.iter() {
        if old.get(name) == Some(new_value) {
            continue;
        }
        match event_name(name, event_prefix) {
            Some(event) => match new_value.as_handler() {
                Some(handler) => bound.push(PropChange::Bind { event, handler }),
                None => tracing::debug!(prop = name, "event prop without a handler skipped"),
            },
            None => set.push(PropChange::Set { name, value: new_value }),
        }
    }

    removed
        .into_iter()
        .chain(unbound)
        .chain(set)
        .chain(bound)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name() {
        assert_eq!(event_name("onClick", "on"), Some("click".to_string()));
        assert_eq!(event_name("onKeyDown", "on"), Some("keydown".to_string()));
        assert_eq!(event_name("on", "on"), None);
        assert_eq!(event_name("title", "on"), None);
    }

    #[test]
    fn test_children_is_reserved() {
        let mut props = Props::new();
        assert_eq!(props.insert("children", "nope"), None);
        assert!(!props.contains("children"));
        assert!(props.is_empty());
    }

    #[test]
    fn test_handler_identity() {
        let a = EventHandler::new(|_| {});
        let b = EventHandler::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_diff_plain_props() {
        let old = Props::new().with("id", "a").with("title", "x").with("stale", 1);
        let new = Props::new().with("id", "a").with("title", "y").with("fresh", true);

        let changes = diff_props(&old, &new, "on");
        assert_eq!(
            changes,
            vec![
                PropChange::Remove { name: "stale" },
                PropChange::Set { name: "fresh", value: &PropValue::Bool(true) },
                PropChange::Set { name: "title", value: &PropValue::Str("y".into()) },
            ]
        );
    }

    #[test]
    fn test_diff_rebinds_changed_handler() {
        let first = EventHandler::new(|_| {});
        let second = EventHandler::new(|_| {});
        let old = Props::new().with("onClick", first.clone());
        let new = Props::new().with("onClick", second.clone());

        let changes = diff_props(&old, &new, "on");
        assert_eq!(
            changes,
            vec![
                PropChange::Unbind { event: "click".into(), handler: &first },
                PropChange::Bind { event: "click".into(), handler: &second },
            ]
        );
    }

    #[test]
    fn test_diff_same_handler_is_noop() {
        let handler = EventHandler::new(|_| {});
        let old = Props::new().with("onClick", handler.clone());
        let new = Props::new().with("onClick", handler);
        assert!(diff_props(&old, &new, "on").is_empty());
    }

    #[test]
    fn test_diff_removed_handler_unbinds() {
        let handler = EventHandler::new(|_| {});
        let old = Props::new().with("onInput", handler.clone());
        let empty = Props::new();
        let changes = diff_props(&old, &empty, "on");
        assert_eq!(changes, vec![PropChange::Unbind { event: "input".into(), handler: &handler }]);
    }

    #[test]
    fn test_diff_from_empty_sets_everything() {
        let handler = EventHandler::new(|_| {});
        let new = Props::new().with("value", "a").with("onClick", handler.clone());
        let empty = Props::new();
        let changes = diff_props(&empty, &new, "on");
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], PropChange::Set { name: "value", .. }));
        assert!(matches!(changes[1], PropChange::Bind { .. }));
    }
}

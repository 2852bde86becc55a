//! Host Renderers
//!
//! The engine never builds real UI itself. It calls a [`HostRenderer`] to
//! create host nodes, diff their properties and link them into a tree.
//!
//! # Renderers
//!
//! - [`HostTree`] - in-memory host tree with a call log and event dispatch
//! - [`terminal`] - paints a `HostTree` subtree with crossterm
//!
//! # Property rules
//!
//! Props named with the event prefix (`on` by default) are listener
//! bindings; every other prop is a plain attribute. The reserved `children`
//! prop is never applied.

mod memory;
pub mod terminal;

use std::fmt;

pub use memory::{HostCall, HostId, HostKind, HostNode, HostTree};

use crate::error::HostError;
use crate::primitives::Props;
use crate::types::NodeType;

/// Host capability the commit and the work loop call into.
///
/// Calls are not retried. An `Err` aborts the current commit.
pub trait HostRenderer {
    /// Reference to one host node.
    type Handle: Clone + PartialEq + fmt::Debug;

    /// Create a detached host node for a host or text fiber, with `props`
    /// already applied.
    fn create_host_node(
        &mut self,
        kind: &NodeType,
        props: &Props,
    ) -> Result<Self::Handle, HostError>;

    /// Move `node` from `old` props to `new` props: remove absent
    /// attributes, rebind changed listeners, set added or changed attributes.
    fn apply_property_diff(
        &mut self,
        node: &Self::Handle,
        old: &Props,
        new: &Props,
    ) -> Result<(), HostError>;

    /// Append `child` to `parent`'s children.
    fn attach(&mut self, parent: &Self::Handle, child: &Self::Handle) -> Result<(), HostError>;

    /// Remove `child` from `parent`'s children.
    fn detach(&mut self, parent: &Self::Handle, child: &Self::Handle) -> Result<(), HostError>;
}

//! Node Model - immutable UI descriptions.
//!
//! This module provides the building blocks of a render:
//! - [`create_element`] - Type + props + children, with text coercion
//! - [`element`] - Fluent builder for host elements
//! - [`text`] - Text leaf (`text` type, `value` prop)
//! - [`component`] - Component node wrapping a render function
//!
//! # Components
//!
//! A component is any `Fn(&Props, &mut Hooks<'_>) -> Node`. It is invoked
//! while its fiber is expanded and may call hook primitives on `hooks`:
//!
//! ```ignore
//! fn counter(_props: &Props, hooks: &mut Hooks<'_>) -> Node {
//!     let (count, set_count) = hooks.use_state(0);
//!     element("h1")
//!         .on("onClick", move |_| set_count.update(|c| c + 1))
//!         .child(format!("Count: {count}"))
//!         .build()
//! }
//!
//! let app = component(counter, Props::new());
//! ```

mod node;
mod types;

pub use node::*;
pub use types::*;

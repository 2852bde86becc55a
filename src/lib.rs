//! # spark-fiber
//!
//! Incremental UI-tree reconciliation for Rust.
//!
//! A UI is described as a tree of immutable [`Node`]s. The engine diffs each new
//! description against the previously committed tree of fibers, computes the
//! minimal set of host mutations, and applies them through a [`HostRenderer`].
//! Components keep local state across re-renders through call-order-indexed
//! hooks ([`Hooks::use_state`], [`Hooks::use_effect`], [`Hooks::use_ref`]).
//!
//! ## Architecture
//!
//! ```text
//! render(node) → work-in-progress root
//!      │
//!      ▼
//! work loop (one fiber per step, yields between steps)
//!      │   expand fiber → reconcile children → pick next fiber
//!      ▼
//! commit (atomic) → deletions, placements, updates → host renderer
//!      │
//!      ▼
//! work-in-progress becomes current, effects run
//! ```
//!
//! Fibers live in per-generation arenas ([`FiberTree`]). A fiber's `alternate`
//! is an index into the previous generation's arena, never an owning pointer.
//!
//! ## Modules
//!
//! - [`types`] - Node types, effect tags, ids, text attributes
//! - [`primitives`] - Node model: `create_element`, `element`, `text`, `component`, props
//! - [`state`] - Hook store: `Hooks`, `SetState`, `RefObject`
//! - [`engine`] - Fiber arena, reconciler, unit of work, commit
//! - [`pipeline`] - `Engine` entry point, work loop, time-slice providers
//! - [`renderer`] - `HostRenderer` trait, in-memory `HostTree`, terminal painter
//!
//! ## Example
//!
//! ```ignore
//! use spark_fiber::{element, Engine, HostTree};
//!
//! let mut host = HostTree::new();
//! let container = host.create_container();
//!
//! let mut engine = Engine::new(host);
//! engine.render(element("div").child("a").build(), container);
//! engine.flush_sync()?;
//!
//! assert_eq!(engine.host().text_content(container), "a");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

pub use types::*;

pub use config::EngineConfig;

pub use error::{ConfigError, EngineError, HookError, HostError};

pub use engine::{CommitReport, Fiber, FiberTree};

pub use pipeline::{
    Deadline, Engine, FrameBudget, FrameDeadline, RunSummary, SliceOutcome, SliceStatus,
    TimeSliceProvider, Unbounded, UnitBudget, UnitDeadline,
};

pub use primitives::{
    component, create_element, diff_props, element, event_name, text, Child, EventHandler,
    HostEvent, Node, NodeBuilder, PropChange, PropValue, Props,
};

pub use renderer::{HostCall, HostId, HostKind, HostNode, HostRenderer, HostTree};

pub use state::{HookKind, Hooks, RefObject, SetState};

//! Fiber Engine - the double-buffered fiber tree and the algorithms over it.
//!
//! - **Fiber** - [`Fiber`] records in a per-generation [`FiberTree`] arena
//! - **Reconcile** - positional diff producing a fiber's child chain
//! - **Work** - expansion of exactly one fiber
//! - **Commit** - atomic application of effect tags to the host
//!
//! # Architecture
//!
//! Two generations exist at most: the committed `current` tree and the
//! `work in progress` tree being built. Each lives in its own arena.
//!
//! ```text
//! current (gen N)              work in progress (gen N+1)
//! ┌────────────────┐           ┌────────────────┐
//! │ #0 Root        │◄─alternate┤ #0 Root        │
//! │ #1 App         │◄─alternate┤ #1 App         │
//! │ #2 div         │◄─alternate┤ #2 div         │
//! │ #3 text  (DEL) │           │ #3 p    (PLACE)│
//! └────────────────┘           └────────────────┘
//! ```
//!
//! On commit the work-in-progress arena replaces the current one wholesale.

mod commit;
mod fiber;
mod reconcile;
mod work;

pub use commit::CommitReport;
pub use fiber::{Fiber, FiberTree};

pub(crate) use commit::{commit_root, run_effects};
pub(crate) use work::UnitOfWork;

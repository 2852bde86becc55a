//! Hook Store - per-component local state that survives re-renders.
//!
//! - **State** - `use_state` value + setter, actions queued between renders
//! - **Effect** - `use_effect` callbacks run after commit, gated by deps
//! - **Ref** - `use_ref` stable mutable cell
//!
//! Records live on the fiber that rendered them and are indexed purely by
//! call order. See [`Hooks`] for the contract.

mod handles;
mod hooks;
mod store;

pub use handles::{RefObject, SetState};
pub use hooks::Hooks;
pub use store::HookKind;

pub(crate) use store::{HookRecord, PendingEffect, UpdateRequests};

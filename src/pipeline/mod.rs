//! Render Pipeline
//!
//! Connects the render entry point to the host through the fiber engine.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Engine::render ──► work loop (sliced) ──► commit ──► effects
//!        ▲                                              │
//!        └──────────── SetState (restart from current) ◄┘
//! ```
//!
//! ## Data Flow
//!
//! 1. **render** - builds a work-in-progress root around the node
//! 2. **work_loop** - expands fibers until the slice's deadline runs low
//! 3. **commit** - applies the finished tree atomically, then runs effects
//!
//! ## Key Design Principles
//!
//! - **Single-threaded**: the engine is `!Send`; setters hold a weak handle
//! - **Interruptible render, atomic commit**: yields happen only between fibers
//! - **Injected time**: slices come from a [`TimeSliceProvider`]

mod engine;
mod scheduler;

pub use engine::Engine;
pub use scheduler::{
    Deadline, FrameBudget, FrameDeadline, RunSummary, SliceOutcome, SliceStatus,
    TimeSliceProvider, Unbounded, UnitBudget, UnitDeadline,
};

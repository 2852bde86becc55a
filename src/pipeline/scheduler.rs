//! Scheduler - cooperative, time-sliced work loop.
//!
//! The loop expands one fiber at a time and checks the slice's deadline
//! after each one. When the deadline runs low it returns, keeping the
//! resume point, and continues on the next slice. A finished pass is
//! committed synchronously inside the slice that finished it.
//!
//! # Time slices
//!
//! The engine does not own a clock. A [`TimeSliceProvider`] hands out one
//! [`Deadline`] per slice:
//!
//! | Provider      | Slice ends                                  |
//! |---------------|---------------------------------------------|
//! | `FrameBudget` | after a wall-clock budget (idle-callback)   |
//! | `UnitBudget`  | after a fixed number of fiber expansions    |
//! | `Unbounded`   | never (synchronous flush)                   |

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::engine::CommitReport;
use crate::error::EngineError;
use crate::renderer::HostRenderer;

use super::engine::Engine;

// =============================================================================
// Deadline & Provider traits
// =============================================================================

/// Time left in the current slice.
pub trait Deadline {
    fn time_remaining(&self) -> Duration;
}

impl<D: Deadline + ?Sized> Deadline for &D {
    fn time_remaining(&self) -> Duration {
        (**self).time_remaining()
    }
}

/// Grants slices to the work loop, one per call.
pub trait TimeSliceProvider {
    type Deadline: Deadline;

    fn next_slice(&mut self) -> Self::Deadline;
}

// =============================================================================
// Stock providers
// =============================================================================

/// A deadline that never runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

impl TimeSliceProvider for Unbounded {
    type Deadline = Unbounded;

    fn next_slice(&mut self) -> Unbounded {
        Unbounded
    }
}

/// Wall-clock budget per slice.
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget {
    budget: Duration,
}

impl FrameBudget {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// About one 60 Hz frame.
    pub fn frame() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

/// Deadline issued by [`FrameBudget`].
#[derive(Debug, Clone, Copy)]
pub struct FrameDeadline {
    ends_at: Instant,
}

impl FrameDeadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            ends_at: Instant::now() + budget,
        }
    }
}

impl Deadline for FrameDeadline {
    fn time_remaining(&self) -> Duration {
        self.ends_at.saturating_duration_since(Instant::now())
    }
}

impl TimeSliceProvider for FrameBudget {
    type Deadline = FrameDeadline;

    fn next_slice(&mut self) -> FrameDeadline {
        FrameDeadline::after(self.budget)
    }
}

/// Fixed number of fiber expansions per slice.
///
/// Deterministic stand-in for a clock: each `time_remaining` query spends
/// one unit, and the work loop queries once per expansion.
#[derive(Debug, Clone, Copy)]
pub struct UnitBudget {
    units: usize,
}

impl UnitBudget {
    /// `units` is clamped to at least 1.
    pub fn new(units: usize) -> Self {
        Self { units: units.max(1) }
    }
}

/// Deadline issued by [`UnitBudget`].
#[derive(Debug)]
pub struct UnitDeadline {
    remaining: Cell<usize>,
}

impl UnitDeadline {
    pub fn new(units: usize) -> Self {
        Self {
            remaining: Cell::new(units),
        }
    }
}

impl Deadline for UnitDeadline {
    fn time_remaining(&self) -> Duration {
        let left = self.remaining.get().saturating_sub(1);
        self.remaining.set(left);
        if left == 0 { Duration::ZERO } else { Duration::MAX }
    }
}

impl TimeSliceProvider for UnitBudget {
    type Deadline = UnitDeadline;

    fn next_slice(&mut self) -> UnitDeadline {
        UnitDeadline::new(self.units)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// How a slice ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceStatus {
    /// No work left and no pending update.
    Idle,
    /// Work remains for a later slice.
    Yielded,
}

/// Result of one [`Engine::work_loop`] slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceOutcome {
    /// Fibers expanded in this slice.
    pub units: usize,
    pub status: SliceStatus,
    /// Set if the slice finished a pass and committed it.
    pub commit: Option<CommitReport>,
}

/// Totals of a multi-slice run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub slices: usize,
    pub units: usize,
    pub commits: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &SliceOutcome) {
        self.slices += 1;
        self.units += outcome.units;
        self.commits += usize::from(outcome.commit.is_some());
    }
}

// =============================================================================
// Work loop
// =============================================================================

impl<R: HostRenderer> Engine<R> {
    /// Run one slice.
    ///
    /// Before each unit, a pending state update restarts the pass from the
    /// committed tree, discarding any in-flight work. At least one unit runs
    /// per slice when work exists. Fails with [`EngineError::Poisoned`] once
    /// a commit has failed.
    pub fn work_loop(&mut self, deadline: &impl Deadline) -> Result<SliceOutcome, EngineError> {
        self.ensure_healthy()?;
        let mut units = 0;

        loop {
            if self.requests.is_pending() && self.root.current.is_some() {
                self.requests.clear();
                self.restart_from_current();
            }

            let Some(next) = self.root.next_unit else {
                break;
            };
            self.perform_unit_of_work(next)?;
            units += 1;

            if deadline.time_remaining() < self.config.yield_threshold {
                tracing::trace!(units, "yielding");
                break;
            }
        }

        let commit = if self.root.next_unit.is_none() {
            self.commit_root()?
        } else {
            None
        };

        let status = if self.is_idle() {
            SliceStatus::Idle
        } else {
            SliceStatus::Yielded
        };

        Ok(SliceOutcome { units, status, commit })
    }

    /// Request slices until the engine is idle.
    ///
    /// Does not return while effects keep scheduling updates.
    pub fn run_until_idle<P: TimeSliceProvider>(
        &mut self,
        provider: &mut P,
    ) -> Result<RunSummary, EngineError> {
        let mut summary = RunSummary::default();
        loop {
            let deadline = provider.next_slice();
            let outcome = self.work_loop(&deadline)?;
            summary.record(&outcome);
            if outcome.status == SliceStatus::Idle {
                return Ok(summary);
            }
        }
    }

    /// Request exactly `slices` slices, whether or not work is pending.
    pub fn run_slices<P: TimeSliceProvider>(
        &mut self,
        provider: &mut P,
        slices: usize,
    ) -> Result<RunSummary, EngineError> {
        let mut summary = RunSummary::default();
        for _ in 0..slices {
            let deadline = provider.next_slice();
            let outcome = self.work_loop(&deadline)?;
            summary.record(&outcome);
        }
        Ok(summary)
    }

    /// Finish all outstanding work without yielding.
    pub fn flush_sync(&mut self) -> Result<RunSummary, EngineError> {
        self.run_until_idle(&mut Unbounded)
    }
}

//! Engine - the mounted tree, its render entry point and commit.
//!
//! One `Engine` owns one host renderer and the Root record of one mounted
//! tree. The work loop lives in [`scheduler`](super::scheduler).
//!
//! # Example
//!
//! ```ignore
//! use spark_fiber::{element, Engine, HostTree};
//!
//! let mut host = HostTree::new();
//! let container = host.create_container();
//! let mut engine = Engine::new(host);
//!
//! engine.render(element("div").child("a").build(), container);
//! engine.flush_sync()?;
//! ```

use std::rc::Rc;

use crate::config::EngineConfig;
use crate::engine::{self, CommitReport, FiberTree, UnitOfWork};
use crate::error::{ConfigError, EngineError};
use crate::primitives::{Node, Props};
use crate::renderer::HostRenderer;
use crate::state::UpdateRequests;
use crate::types::{EffectTag, FiberId};

// =============================================================================
// Root
// =============================================================================

/// Scheduling state of one mounted tree.
pub(crate) struct Root<H> {
    /// Last committed generation.
    pub(crate) current: Option<FiberTree<H>>,
    /// Generation being built.
    pub(crate) wip: Option<FiberTree<H>>,
    /// Resume point of the in-flight traversal.
    pub(crate) next_unit: Option<FiberId>,
    /// Prior-generation fibers to detach at the next commit.
    pub(crate) deletions: Vec<FiberId>,
    /// Last generation number handed out.
    pub(crate) generation: u64,
}

impl<H> Default for Root<H> {
    fn default() -> Self {
        Self {
            current: None,
            wip: None,
            next_unit: None,
            deletions: Vec::new(),
            generation: 0,
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Reconciliation engine for one mounted tree.
///
/// A host failure during commit poisons the engine: the host tree no longer
/// matches any fiber generation, so every later slice fails with
/// [`EngineError::Poisoned`]. Mount a fresh engine on a fresh container to
/// recover.
pub struct Engine<R: HostRenderer> {
    host: R,
    pub(crate) root: Root<R::Handle>,
    pub(crate) config: EngineConfig,
    pub(crate) requests: Rc<UpdateRequests>,
    last_commit: Option<CommitReport>,
    /// Generation whose commit failed.
    poisoned: Option<u64>,
}

impl<R: HostRenderer> Engine<R> {
    pub fn new(host: R) -> Self {
        Self::from_parts(host, EngineConfig::default())
    }

    /// Engine with a validated `config`.
    pub fn with_config(host: R, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(host, config))
    }

    fn from_parts(host: R, config: EngineConfig) -> Self {
        Self {
            host,
            root: Root::default(),
            config,
            requests: Rc::new(UpdateRequests::default()),
            last_commit: None,
            poisoned: None,
        }
    }

    /// Start a render pass of `node` into `container`.
    ///
    /// Any uncommitted pass is discarded. Nothing touches the host until the
    /// work loop finishes the pass and commits.
    pub fn render(&mut self, node: Node, container: R::Handle) {
        let props = Rc::new(Props::new().with_children(vec![node]));
        self.begin_pass(container, props);

        // This pass re-renders every hook, so queued actions are picked up.
        self.requests.clear();

        tracing::debug!(generation = self.root.generation, "render requested");
    }

    /// Restart from the committed tree, as a state update does.
    ///
    /// Returns `false` before the first commit.
    pub fn restart_from_current(&mut self) -> bool {
        let Some(current) = &self.root.current else {
            return false;
        };
        let root = current.root();
        let (Some(container), props) = (root.host.clone(), Rc::clone(&root.props)) else {
            return false;
        };

        let discarded = self.root.wip.is_some();
        self.begin_pass(container, props);

        tracing::debug!(
            generation = self.root.generation,
            discarded,
            "restarting from current root"
        );
        true
    }

    fn begin_pass(&mut self, container: R::Handle, props: Rc<Props>) {
        self.discard_work_in_progress();

        self.root.generation += 1;
        let alternate = self.root.current.as_ref().map(|_| FiberId::ROOT);
        self.root.wip = Some(FiberTree::with_root(
            self.root.generation,
            container,
            props,
            alternate,
        ));
        self.root.next_unit = Some(FiberId::ROOT);
    }

    /// Drop the in-flight pass and undo its deletion marks.
    pub(crate) fn discard_work_in_progress(&mut self) {
        self.root.wip = None;
        self.root.next_unit = None;

        let deletions = std::mem::take(&mut self.root.deletions);
        if let Some(current) = self.root.current.as_mut() {
            for id in deletions {
                current[id].effect_tag = EffectTag::None;
            }
        }
    }

    /// Expand one fiber of the in-flight pass.
    pub(crate) fn perform_unit_of_work(&mut self, id: FiberId) -> Result<(), EngineError> {
        let Some(wip) = self.root.wip.as_mut() else {
            self.root.next_unit = None;
            return Ok(());
        };

        let unit = UnitOfWork {
            host: &mut self.host,
            wip,
            current: self.root.current.as_mut(),
            deletions: &mut self.root.deletions,
            requests: Rc::downgrade(&self.requests),
            strict_hooks: self.config.strict_hooks,
        };

        match unit.perform(id) {
            Ok(next) => {
                self.root.next_unit = next;
                Ok(())
            }
            Err(error) => {
                tracing::debug!(%error, "render pass aborted");
                self.discard_work_in_progress();
                Err(error)
            }
        }
    }

    /// Fail if an earlier commit left the host tree half updated.
    pub(crate) fn ensure_healthy(&self) -> Result<(), EngineError> {
        match self.poisoned {
            Some(generation) => Err(EngineError::Poisoned { generation }),
            None => Ok(()),
        }
    }

    /// Commit the finished pass, promote it and run effects.
    ///
    /// A host failure leaves the host tree partially updated. The pass is
    /// dropped, the previous tree stays current and the engine is poisoned.
    pub(crate) fn commit_root(&mut self) -> Result<Option<CommitReport>, EngineError> {
        let Some(wip) = self.root.wip.take() else {
            return Ok(None);
        };
        let generation = wip.generation();
        let _span = tracing::debug_span!("commit", generation).entered();

        let committed = engine::commit_root(
            &mut self.host,
            &wip,
            self.root.current.as_ref(),
            &self.root.deletions,
        );
        let mut report = match committed {
            Ok(report) => report,
            Err(error) => {
                tracing::error!(%error, generation, "commit failed, engine poisoned");
                self.discard_work_in_progress();
                self.poisoned = Some(generation);
                return Err(error);
            }
        };

        self.root.deletions.clear();
        self.root.next_unit = None;
        let current = self.root.current.insert(wip);

        report.effects_run = engine::run_effects(current);

        tracing::debug!(
            placements = report.placements,
            updates = report.updates,
            deletions = report.deletions,
            effects = report.effects_run,
            "committed"
        );

        self.last_commit = Some(report.clone());
        Ok(Some(report))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn host(&self) -> &R {
        &self.host
    }

    /// Mutable host access, e.g. to dispatch events. Mutating the host tree
    /// behind the engine's back is not tracked.
    pub fn host_mut(&mut self) -> &mut R {
        &mut self.host
    }

    pub fn into_host(self) -> R {
        self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Last committed generation.
    pub fn current(&self) -> Option<&FiberTree<R::Handle>> {
        self.root.current.as_ref()
    }

    /// Generation being built, if a pass is in flight.
    pub fn work_in_progress(&self) -> Option<&FiberTree<R::Handle>> {
        self.root.wip.as_ref()
    }

    /// Resume point of the in-flight pass.
    pub fn next_unit_of_work(&self) -> Option<FiberId> {
        self.root.next_unit
    }

    /// Prior-generation fibers marked for deletion by the in-flight pass.
    pub fn deletions(&self) -> &[FiberId] {
        &self.root.deletions
    }

    /// A state update is waiting for the next pass.
    pub fn has_pending_update(&self) -> bool {
        self.requests.is_pending()
    }

    /// Setter calls since the engine was created.
    pub fn update_count(&self) -> u64 {
        self.requests.total()
    }

    /// Nothing in flight and nothing that would start a pass.
    pub fn is_idle(&self) -> bool {
        self.root.next_unit.is_none()
            && self.root.wip.is_none()
            && !(self.requests.is_pending() && self.root.current.is_some())
    }

    pub fn last_commit(&self) -> Option<&CommitReport> {
        self.last_commit.as_ref()
    }

    /// Generation whose failed commit poisoned the engine.
    pub fn poisoned(&self) -> Option<u64> {
        self.poisoned
    }
}

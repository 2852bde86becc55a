//! Commit - apply a finished work-in-progress tree to the host in one pass.
//!
//! Order inside one commit:
//! 1. every deletion, in the order the reconciler recorded them
//! 2. placements and updates, depth-first pre-order over the new tree
//!
//! The pass never yields. Promotion of the new tree, retirement of consumed
//! state actions and effect callbacks happen afterwards, in the engine.

use crate::error::EngineError;
use crate::renderer::HostRenderer;
use crate::types::{EffectTag, FiberId};

use super::fiber::FiberTree;

/// What one commit applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Generation that became current.
    pub generation: u64,
    /// Fibers tagged PLACEMENT.
    pub placements: usize,
    /// Fibers tagged UPDATE.
    pub updates: usize,
    /// Prior-generation fibers tagged DELETION.
    pub deletions: usize,
    /// Effect callbacks run after promotion.
    pub effects_run: usize,
}

impl CommitReport {
    /// No fiber was placed or deleted.
    pub fn is_structurally_stable(&self) -> bool {
        self.placements == 0 && self.deletions == 0
    }
}

/// Apply deletions, then placements and updates.
pub(crate) fn commit_root<R: HostRenderer>(
    host: &mut R,
    wip: &FiberTree<R::Handle>,
    current: Option<&FiberTree<R::Handle>>,
    deletions: &[FiberId],
) -> Result<CommitReport, EngineError> {
    let mut report = CommitReport {
        generation: wip.generation(),
        ..CommitReport::default()
    };

    if let Some(current) = current {
        for &id in deletions {
            commit_deletion(host, current, id)?;
            report.deletions += 1;
        }
    }

    let mut stack: Vec<FiberId> = wip.root().child.into_iter().collect();
    while let Some(id) = stack.pop() {
        let fiber = &wip[id];

        match fiber.effect_tag {
            EffectTag::Placement => {
                report.placements += 1;
                if let Some(child) = &fiber.host {
                    let parent = wip
                        .host_parent(id)
                        .ok_or(EngineError::DetachedFiber { fiber: id })?;
                    host.attach(parent, child)?;
                }
            }
            EffectTag::Update => {
                report.updates += 1;
                if let Some(node) = &fiber.host {
                    let old = fiber
                        .alternate
                        .zip(current)
                        .and_then(|(alternate, current)| current.get(alternate))
                        .ok_or(EngineError::MissingAlternate { fiber: id })?;
                    host.apply_property_diff(node, &old.props, &fiber.props)?;
                }
            }
            EffectTag::Deletion | EffectTag::None => {}
        }

        if let Some(sibling) = fiber.sibling {
            stack.push(sibling);
        }
        if let Some(child) = fiber.child {
            stack.push(child);
        }
    }

    Ok(report)
}

/// Detach the first host node at or below a deleted fiber from its host
/// parent. A subtree with no host node is skipped.
fn commit_deletion<R: HostRenderer>(
    host: &mut R,
    current: &FiberTree<R::Handle>,
    id: FiberId,
) -> Result<(), EngineError> {
    let Some(child) = current.first_host(id) else {
        tracing::debug!(fiber = id.index(), "deleted subtree owns no host node");
        return Ok(());
    };
    let parent = current
        .host_parent(id)
        .ok_or(EngineError::DetachedFiber { fiber: id })?;
    host.detach(parent, child)?;
    Ok(())
}

/// Retire consumed state actions and run queued effects, pre-order.
/// Returns how many effects ran.
pub(crate) fn run_effects<H>(tree: &mut FiberTree<H>) -> usize {
    for fiber in tree.iter_mut() {
        for hook in &mut fiber.hooks {
            hook.retire_consumed();
        }
    }

    let mut ran = 0;
    for id in tree.preorder(FiberId::ROOT) {
        for effect in std::mem::take(&mut tree[id].pending_effects) {
            effect();
            ran += 1;
        }
    }
    ran
}

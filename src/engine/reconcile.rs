//! Reconciler - positional diff of new child nodes against the previous
//! generation's child chain.
//!
//! Both sequences are walked in lockstep by position. There are no keys:
//! reordering children of the same type is a series of updates, not moves.
//!
//! | previous | new   | same type | result                                  |
//! |----------|-------|-----------|-----------------------------------------|
//! | yes      | yes   | yes       | UPDATE, host node and alternate carried |
//! | yes      | yes   | no        | PLACEMENT + previous tagged DELETION    |
//! | no       | yes   | -         | PLACEMENT                               |
//! | yes      | no    | -         | previous tagged DELETION                |

use crate::primitives::Node;
use crate::types::{EffectTag, FiberId};

use super::fiber::{Fiber, FiberTree};

/// Build the child chain of `parent` in `wip` from `elements`.
///
/// Deleted prior-generation fibers are tagged in `current` and appended to
/// `deletions`.
pub(crate) fn reconcile_children<H: Clone>(
    wip: &mut FiberTree<H>,
    mut current: Option<&mut FiberTree<H>>,
    parent: FiberId,
    elements: &[Node],
    deletions: &mut Vec<FiberId>,
) {
    let mut old = match (wip[parent].alternate, current.as_deref()) {
        (Some(alternate), Some(current)) => current.get(alternate).and_then(|fiber| fiber.child),
        _ => None,
    };

    wip[parent].child = None;
    let mut previous_sibling: Option<FiberId> = None;
    let mut index = 0;

    while index < elements.len() || old.is_some() {
        let element = elements.get(index);
        let old_fiber = match (old, current.as_deref()) {
            (Some(old), Some(current)) => current.get(old),
            _ => None,
        };

        let same_type = match (element, old_fiber) {
            (Some(element), Some(old_fiber)) => element.kind() == &old_fiber.kind,
            _ => false,
        };

        let new_fiber = match element {
            Some(element) => {
                let mut fiber =
                    Fiber::new(element.kind().clone(), element.props_rc(), Some(parent));
                match old_fiber.filter(|_| same_type) {
                    Some(old_fiber) => {
                        fiber.host = old_fiber.host.clone();
                        fiber.alternate = old;
                        fiber.effect_tag = EffectTag::Update;
                    }
                    None => fiber.effect_tag = EffectTag::Placement,
                }
                Some(wip.alloc(fiber))
            }
            None => None,
        };

        let next_old = old_fiber.and_then(|fiber| fiber.sibling);

        if let (Some(old), false) = (old, same_type) {
            if let Some(current) = current.as_deref_mut() {
                current[old].effect_tag = EffectTag::Deletion;
                deletions.push(old);
            }
        }

        if let Some(new_fiber) = new_fiber {
            match previous_sibling {
                None => wip[parent].child = Some(new_fiber),
                Some(sibling) => wip[sibling].sibling = Some(new_fiber),
            }
            previous_sibling = Some(new_fiber);
        }

        old = next_old;
        index += 1;
    }
}

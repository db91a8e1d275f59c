//! Fork assembly
//!
//! Fork nodes are synthetic: they carry no yaml anchor and no work of
//! their own, only the declaration that their children may run in
//! parallel. A concern with zero leaves produces no fork at all; a
//! concern with one leaf is still wrapped so parents reference a uniform
//! child type.

use plan_types::{NodeId, PlanNode, StepParameters, StepType};

/// Build a fork over `child_ids`, listed in the order the leaves were
/// built. Returns `None` when there are no children.
pub fn fork_node(child_ids: Vec<NodeId>, identifier: &str) -> Option<PlanNode> {
    if child_ids.is_empty() {
        return None;
    }
    Some(PlanNode::new(
        NodeId::generate(),
        identifier,
        identifier,
        StepType::Fork,
        StepParameters::Fork {
            parallel_node_ids: child_ids,
        },
    ))
}

//! Condition synchronization.
//!
//! A branch condition caches the target of the edge that realizes it. Every store
//! mutation that adds, removes or rewires an edge leaving a branch, deletes a node, or
//! replaces a branch's conditions ends by calling [`resync_branch`] for each branch it
//! touched. Nothing else in the store writes `Condition::target_node_id`.

use crate::model::{Edge, Workflow};
use ahash::{AHashMap, AHashSet};

/// Re-derives every condition target of `branch_id` from the edge list.
///
/// Does nothing if `branch_id` is unknown or not a branch.
pub(crate) fn resync_branch(workflow: &mut Workflow, branch_id: &str) {
    let targets: AHashMap<&str, &str> = workflow
        .edges
        .iter()
        .filter(|e| e.source == branch_id)
        .filter_map(|e| e.source_handle.as_deref().map(|h| (h, e.target.as_str())))
        .collect();

    let Some(branch) = workflow
        .nodes
        .iter_mut()
        .find(|n| n.id == branch_id)
        .and_then(|n| n.as_branch_mut())
    else {
        return;
    };

    for condition in &mut branch.conditions {
        let target = targets.get(condition.id.as_str()).copied().unwrap_or("");
        if condition.target_node_id != target {
            tracing::trace!(
                branch = branch_id,
                condition = %condition.id,
                from = %condition.target_node_id,
                to = target,
                "condition target resynced"
            );
            condition.target_node_id = target.to_string();
        }
    }
}

/// Resyncs every distinct source node of `edges`.
pub(crate) fn resync_sources<'a>(workflow: &mut Workflow, edges: impl IntoIterator<Item = &'a Edge>) {
    let mut seen = AHashSet::new();
    for edge in edges {
        if seen.insert(edge.source.as_str()) {
            resync_branch(workflow, &edge.source);
        }
    }
}

/// Resyncs every branch in the workflow.
pub(crate) fn resync_all(workflow: &mut Workflow) {
    let branch_ids: Vec<String> = workflow
        .nodes
        .iter()
        .filter(|n| n.as_branch().is_some())
        .map(|n| n.id.clone())
        .collect();
    for id in branch_ids {
        resync_branch(workflow, &id);
    }
}

//! Common test utilities for building workflow graphs.
use intakeflow::prelude::*;
use intakeflow::seed;

/// The stock BMI workflow, loaded into a store.
#[allow(dead_code)]
pub fn seed_graph() -> WorkflowGraph {
    seed::bmi_intake().expect("seed workflow should load")
}

/// A small branching graph for condition tests.
///
/// `start → branch`, with the branch holding conditions `c1` and `c2` (both on
/// variable `score`, produced by nothing) and three unconnected avatar steps `x`,
/// `y`, `z` as candidate targets.
#[allow(dead_code)]
pub struct BranchFixture {
    pub graph: WorkflowGraph,
    pub start: String,
    pub branch: String,
    pub x: String,
    pub y: String,
    pub z: String,
}

#[allow(dead_code)]
pub fn branch_fixture() -> BranchFixture {
    let mut graph = WorkflowGraph::new();
    let start = graph.add_node(NodeType::Start, Position::default());
    let branch = graph.add_node(NodeType::Branch, Position::default());
    let x = graph.add_node(NodeType::AvatarStep, Position::default());
    let y = graph.add_node(NodeType::AvatarStep, Position::default());
    let z = graph.add_node(NodeType::AvatarStep, Position::default());
    graph.update_node_data(
        &branch,
        NodePatch::conditions(vec![
            Condition::new("c1", "score", Operator::SmallerThan, 10.0),
            Condition::new("c2", "score", Operator::GreaterThanOrEqual, 10.0),
        ]),
    );
    graph
        .add_edge(Connection::new(&start, &branch))
        .expect("start → branch");
    BranchFixture {
        graph,
        start,
        branch,
        x,
        y,
        z,
    }
}

/// The cached target of condition `condition_id` on branch `branch_id`.
#[allow(dead_code)]
pub fn cached_target(graph: &WorkflowGraph, branch_id: &str, condition_id: &str) -> String {
    graph
        .node(branch_id)
        .and_then(|n| n.as_branch())
        .and_then(|b| b.condition(condition_id))
        .map(|c| c.target_node_id.clone())
        .expect("condition should exist")
}

/// Asserts that every condition cache agrees with the edge list, that no condition
/// handle carries two edges, and that no edge dangles.
#[allow(dead_code)]
pub fn assert_consistent(workflow: &Workflow) {
    for node in &workflow.nodes {
        let Some(branch) = node.as_branch() else {
            continue;
        };
        for condition in &branch.conditions {
            let expected = workflow
                .condition_target(&node.id, &condition.id)
                .unwrap_or("");
            assert_eq!(
                condition.target_node_id, expected,
                "condition '{}' of '{}' is out of sync",
                condition.id, node.id
            );
        }
    }

    for (i, a) in workflow.edges.iter().enumerate() {
        assert!(workflow.contains_node(&a.source), "edge '{}' has a dangling source", a.id);
        assert!(workflow.contains_node(&a.target), "edge '{}' has a dangling target", a.id);
        for b in &workflow.edges[i + 1..] {
            assert_ne!(a.id, b.id, "duplicate edge id");
            if a.source_handle.is_some() {
                assert!(
                    !(a.source == b.source && a.source_handle == b.source_handle),
                    "edges '{}' and '{}' share a source handle",
                    a.id,
                    b.id
                );
            }
        }
    }
}

/// Counts the violations of one kind.
#[allow(dead_code)]
pub fn count_kind(violations: &[Violation], kind: ViolationKind) -> usize {
    violations.iter().filter(|v| v.kind() == kind).count()
}

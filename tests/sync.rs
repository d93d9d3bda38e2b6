//! Tests that branch condition targets follow the edge list through every mutation.
mod common;
use common::*;
use intakeflow::prelude::*;

#[test]
fn test_new_conditions_have_no_target() {
    let f = branch_fixture();
    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), "");
    assert_eq!(cached_target(&f.graph, &f.branch, "c2"), "");
}

#[test]
fn test_add_edge_through_handle_sets_target() {
    let mut f = branch_fixture();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();

    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), f.x);
    assert_eq!(cached_target(&f.graph, &f.branch, "c2"), "");
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_deleting_edge_clears_target_and_readding_restores_it() {
    let mut f = branch_fixture();
    let edge = f
        .graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();
    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), f.x);

    f.graph.delete_edge(&edge);
    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), "");

    f.graph
        .add_edge(Connection::new(&f.branch, &f.y).with_source_handle("c1"))
        .unwrap();
    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), f.y);
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_reconnect_to_new_target_on_same_handle() {
    let mut f = branch_fixture();
    let edge = f
        .graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();

    // The old edge still holds the handle, but it is the one being replaced.
    let new_id = f
        .graph
        .reconnect_edge(&edge, Connection::new(&f.branch, &f.z).with_source_handle("c1"))
        .unwrap();

    assert!(new_id.is_some());
    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), f.z);
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_reconnect_across_handles_moves_the_target() {
    let mut f = branch_fixture();
    let edge = f
        .graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();

    f.graph
        .reconnect_edge(&edge, Connection::new(&f.branch, &f.x).with_source_handle("c2"))
        .unwrap();

    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), "");
    assert_eq!(cached_target(&f.graph, &f.branch, "c2"), f.x);
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_reconnect_away_from_branch_clears_target() {
    let mut f = branch_fixture();
    let edge = f
        .graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();

    f.graph
        .reconnect_edge(&edge, Connection::new(&f.start, &f.x))
        .unwrap();

    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), "");
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_rejected_reconnect_keeps_targets() {
    let mut f = branch_fixture();
    let first = f
        .graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.y).with_source_handle("c2"))
        .unwrap();

    let result = f
        .graph
        .reconnect_edge(&first, Connection::new(&f.branch, &f.z).with_source_handle("c2"));

    assert!(matches!(result, Err(GraphError::HandleOccupied { .. })));
    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), f.x);
    assert_eq!(cached_target(&f.graph, &f.branch, "c2"), f.y);
}

#[test]
fn test_deleting_target_node_clears_target() {
    let mut f = branch_fixture();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.y).with_source_handle("c2"))
        .unwrap();

    f.graph.delete_node(&f.x);

    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), "");
    assert_eq!(cached_target(&f.graph, &f.branch, "c2"), f.y);
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_seed_targets_follow_deleted_outcome_node() {
    let mut graph = seed_graph();
    assert_eq!(
        cached_target(&graph, "branch_bmi", "condition_overweight"),
        "avatar_overweight"
    );

    graph.delete_node("avatar_overweight");

    assert_eq!(cached_target(&graph, "branch_bmi", "condition_overweight"), "");
    assert_eq!(
        cached_target(&graph, "branch_bmi", "condition_normal"),
        "avatar_normal"
    );
    assert_consistent(graph.snapshot());
}

#[test]
fn test_conditions_patch_discards_preset_targets() {
    let mut f = branch_fixture();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();

    let mut c1 = Condition::new("c1", "score", Operator::SmallerThan, 5.0);
    c1.target_node_id = f.z.clone();
    let mut c2 = Condition::new("c2", "score", Operator::GreaterThanOrEqual, 5.0);
    c2.target_node_id = f.y.clone();
    f.graph
        .update_node_data(&f.branch, NodePatch::conditions(vec![c1, c2]));

    assert_eq!(cached_target(&f.graph, &f.branch, "c1"), f.x);
    assert_eq!(cached_target(&f.graph, &f.branch, "c2"), "");
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_conditions_patch_removes_edges_of_dropped_conditions() {
    let mut f = branch_fixture();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.y).with_source_handle("c2"))
        .unwrap();

    f.graph.update_node_data(
        &f.branch,
        NodePatch::conditions(vec![Condition::new(
            "c2",
            "score",
            Operator::GreaterThanOrEqual,
            10.0,
        )]),
    );

    let workflow = f.graph.snapshot();
    assert!(workflow.condition_edge(&f.branch, "c1").is_none());
    assert_eq!(workflow.condition_target(&f.branch, "c2"), Some(f.y.as_str()));
    assert_consistent(workflow);
}

#[test]
fn test_remove_condition_removes_its_edge() {
    let mut f = branch_fixture();
    f.graph
        .add_edge(Connection::new(&f.branch, &f.x).with_source_handle("c1"))
        .unwrap();
    let edges_before = f.graph.edges().len();

    f.graph.remove_condition(&f.branch, "c1");

    let branch = f.graph.node(&f.branch).unwrap().as_branch().unwrap();
    assert!(branch.condition("c1").is_none());
    assert_eq!(f.graph.edges().len(), edges_before - 1);
    assert_consistent(f.graph.snapshot());
}

#[test]
fn test_add_condition_then_connect() {
    let mut f = branch_fixture();
    let id = f.graph.add_condition(&f.branch).unwrap();
    assert_eq!(id, "condition_1");

    f.graph.update_condition(
        &f.branch,
        &id,
        ConditionPatch {
            variable: Some("score".to_string()),
            value: Some(ConditionValue::Number(42.0)),
            ..Default::default()
        },
    );
    let edge = f
        .graph
        .add_edge(Connection::new(&f.branch, &f.z).with_source_handle(&id))
        .unwrap();

    assert_eq!(cached_target(&f.graph, &f.branch, &id), f.z);
    assert_eq!(
        f.graph.snapshot().edge_condition_label(&edge).as_deref(),
        Some("score == 42")
    );
}

#[test]
fn test_add_condition_on_non_branch_is_ignored() {
    let mut f = branch_fixture();
    assert_eq!(f.graph.add_condition(&f.x), None);
    assert_eq!(f.graph.add_condition("missing"), None);
}

#[test]
fn test_load_recomputes_stale_targets() {
    let mut workflow = intakeflow::seed::bmi_intake_workflow();
    if let NodeKind::Branch(data) = &mut workflow.nodes[4].kind {
        data.conditions[0].target_node_id = "end".to_string();
        data.conditions[1].target_node_id = String::new();
    }

    let graph = WorkflowGraph::load(workflow).unwrap();

    assert_eq!(
        cached_target(&graph, "branch_bmi", "condition_underweight"),
        "avatar_underweight"
    );
    assert_eq!(
        cached_target(&graph, "branch_bmi", "condition_overweight"),
        "avatar_overweight"
    );
}

//! Tests for the guardrail rules and variable resolution.
mod common;
use common::*;
use intakeflow::prelude::*;
use intakeflow::variables::produced_variable;

#[test]
fn test_seed_workflow_is_clean() {
    let graph = seed_graph();
    let violations = validate(graph.snapshot());
    assert!(violations.is_empty(), "unexpected violations: {:?}", violations);
}

#[test]
fn test_orphan_without_video() {
    let mut graph = WorkflowGraph::new();
    graph.add_node(NodeType::Start, Position::default());
    let a = graph.add_node(NodeType::AvatarStep, Position::default());

    let violations = validate(graph.snapshot());
    assert_eq!(
        violations,
        vec![
            Violation::Orphan {
                node_id: a.clone(),
                name: a.clone(),
            },
            Violation::MissingVideo {
                node_id: a.clone(),
                name: a.clone(),
            },
            Violation::NoEndNode,
        ]
    );
}

#[test]
fn test_orphan_with_video() {
    let mut graph = WorkflowGraph::new();
    graph.add_node(NodeType::Start, Position::default());
    let a = graph.add_node(NodeType::AvatarStep, Position::default());
    graph.update_node_data(&a, NodePatch::video_id("vid_welcome"));

    let messages = validate_messages(graph.snapshot());
    assert_eq!(
        messages,
        vec![
            "Node \"node_2\" has no incoming connections".to_string(),
            "Workflow must have at least one End node".to_string(),
        ]
    );
}

#[test]
fn test_start_nodes_are_never_orphans() {
    let mut graph = WorkflowGraph::new();
    graph.add_node(NodeType::Start, Position::default());
    graph.add_node(NodeType::Start, Position::default());
    let end = graph.add_node(NodeType::End, Position::default());

    let violations = validate(graph.snapshot());
    assert_eq!(count_kind(&violations, ViolationKind::Orphan), 1);
    assert_eq!(violations[0].node_id(), Some(end.as_str()));
    assert_eq!(violations[0].to_string(), "Node \"end node\" has no incoming connections");
}

#[test]
fn test_missing_video_names_the_question() {
    let mut graph = seed_graph();
    graph.update_node_data("avatar_height", NodePatch::video_id(""));

    let messages = validate_messages(graph.snapshot());
    assert_eq!(
        messages,
        vec!["Avatar step \"What is your height?\" is missing a video selection".to_string()]
    );
}

#[test]
fn test_select_category_triggers_missing_video() {
    let mut graph = seed_graph();
    graph.select_category("avatar_normal", "vitals");

    let violations = validate(graph.snapshot());
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind(), ViolationKind::MissingVideo);
    assert_eq!(violations[0].node_id(), Some("avatar_normal"));
}

#[test]
fn test_undefined_variable() {
    let mut graph = seed_graph();
    graph.update_condition(
        "branch_bmi",
        "condition_normal",
        ConditionPatch {
            variable: Some("nonexistent".to_string()),
            ..Default::default()
        },
    );

    let violations = validate(graph.snapshot());
    assert_eq!(
        violations,
        vec![Violation::UndefinedVariable {
            node_id: "branch_bmi".to_string(),
            condition_id: "condition_normal".to_string(),
            variable: "nonexistent".to_string(),
        }]
    );
    assert_eq!(
        violations[0].to_string(),
        "Branch node uses undefined variable \"nonexistent\""
    );
}

#[test]
fn test_empty_condition_variable_is_undefined() {
    let mut f = branch_fixture();
    f.graph.add_condition(&f.branch);

    let violations = validate(f.graph.snapshot());
    let undefined: Vec<&str> = violations
        .iter()
        .filter_map(|v| match v {
            Violation::UndefinedVariable { variable, .. } => Some(variable.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(undefined, vec!["score", "score", ""]);
}

#[test]
fn test_variable_resolution_is_global() {
    // The producer sits after the branch and is unreachable; it still defines the name.
    let mut graph = seed_graph();
    graph.update_condition(
        "branch_bmi",
        "condition_normal",
        ConditionPatch {
            variable: Some("follow_up".to_string()),
            ..Default::default()
        },
    );
    let late = graph.add_node(NodeType::AvatarStep, Position::default());
    graph.update_node_data(
        &late,
        NodePatch {
            video_id: Some("vid_welcome".to_string()),
            variable_name: Some("follow_up".to_string()),
            ..Default::default()
        },
    );
    graph.add_edge(Connection::new("avatar_normal", &late)).unwrap();

    assert!(validate(graph.snapshot()).is_empty());
}

#[test]
fn test_computation_missing_output_variable() {
    let mut graph = seed_graph();
    graph.update_node_data("compute_bmi", NodePatch::output_variable(""));

    let messages = validate_messages(graph.snapshot());
    // Clearing the output also leaves the branch conditions reading an undefined "bmi".
    assert_eq!(
        messages,
        vec![
            "Branch node uses undefined variable \"bmi\"".to_string(),
            "Branch node uses undefined variable \"bmi\"".to_string(),
            "Branch node uses undefined variable \"bmi\"".to_string(),
            "Computation node \"Calculate BMI\" is missing output variable name".to_string(),
        ]
    );
}

#[test]
fn test_computation_missing_formula() {
    let mut graph = seed_graph();
    graph.update_node_data("compute_bmi", NodePatch::formula(""));

    assert_eq!(
        validate(graph.snapshot()),
        vec![Violation::IncompleteComputation {
            node_id: "compute_bmi".to_string(),
            name: "Calculate BMI".to_string(),
            missing: MissingPart::Formula,
        }]
    );
}

#[test]
fn test_unconfigured_computation_is_not_reported() {
    let mut graph = seed_graph();
    let compute = graph.add_node(NodeType::Computation, Position::default());
    graph.add_edge(Connection::new("avatar_weight", &compute)).unwrap();

    assert!(validate(graph.snapshot()).is_empty());
}

#[test]
fn test_no_end_node() {
    let mut graph = seed_graph();
    graph.delete_node("end");

    let violations = validate(graph.snapshot());
    assert_eq!(violations, vec![Violation::NoEndNode]);
    assert_eq!(violations[0].node_id(), None);
}

#[test]
fn test_rules_run_in_fixed_order() {
    let mut graph = WorkflowGraph::new();
    let compute = graph.add_node(NodeType::Computation, Position::default());
    graph.update_node_data(&compute, NodePatch::formula("a + b"));
    let branch = graph.add_node(NodeType::Branch, Position::default());
    graph.update_node_data(
        &branch,
        NodePatch::conditions(vec![Condition::new("c1", "ghost", Operator::Equal, "yes")]),
    );
    graph.add_node(NodeType::AvatarStep, Position::default());

    let kinds: Vec<ViolationKind> = validate(graph.snapshot()).iter().map(|v| v.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::Orphan,
            ViolationKind::Orphan,
            ViolationKind::Orphan,
            ViolationKind::MissingVideo,
            ViolationKind::UndefinedVariable,
            ViolationKind::IncompleteComputation,
            ViolationKind::NoEndNode,
        ]
    );
}

#[test]
fn test_validate_is_deterministic() {
    let mut graph = seed_graph();
    graph.delete_edge("edge_compute_branch");
    graph.update_node_data("avatar_weight", NodePatch::video_id(""));

    let first = validate(graph.snapshot());
    let second = validate(graph.snapshot());
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_defined_variables_and_producers() {
    let mut graph = seed_graph();
    let defined = defined_variables(graph.snapshot());
    let mut names: Vec<&str> = defined.iter().map(String::as_str).collect();
    names.sort();
    assert_eq!(names, vec!["bmi", "height", "weight"]);

    let twin = graph.add_node(NodeType::Computation, Position::default());
    graph.update_node_data(&twin, NodePatch::output_variable("bmi"));
    assert_eq!(producers(graph.snapshot(), "bmi"), vec!["compute_bmi", twin.as_str()]);
    assert!(producers(graph.snapshot(), "age").is_empty());
}

#[test]
fn test_empty_names_are_not_produced() {
    let mut graph = WorkflowGraph::new();
    let a = graph.add_node(NodeType::AvatarStep, Position::default());
    graph.update_node_data(&a, NodePatch::variable_name(""));

    let node = graph.node(&a).unwrap();
    assert_eq!(produced_variable(node), None);
    assert!(defined_variables_in(graph.nodes()).is_empty());
}

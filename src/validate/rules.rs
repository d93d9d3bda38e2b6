use super::{MissingPart, Violation};
use crate::model::{NodeKind, NodeType, Workflow};
use ahash::AHashSet;

pub(super) fn orphans(workflow: &Workflow, out: &mut Vec<Violation>) {
    let targeted: AHashSet<&str> = workflow.edges.iter().map(|e| e.target.as_str()).collect();
    out.extend(
        workflow
            .nodes
            .iter()
            .filter(|n| n.node_type() != NodeType::Start && !targeted.contains(n.id.as_str()))
            .map(|n| Violation::Orphan {
                node_id: n.id.clone(),
                name: n.display_name().to_string(),
            }),
    );
}

pub(super) fn missing_videos(workflow: &Workflow, out: &mut Vec<Violation>) {
    for node in &workflow.nodes {
        let NodeKind::AvatarStep(data) = &node.kind else {
            continue;
        };
        if data.video_id.is_empty() {
            let name = if data.question_text.is_empty() {
                &node.id
            } else {
                &data.question_text
            };
            out.push(Violation::MissingVideo {
                node_id: node.id.clone(),
                name: name.clone(),
            });
        }
    }
}

pub(super) fn undefined_variables(
    workflow: &Workflow,
    defined: &AHashSet<String>,
    out: &mut Vec<Violation>,
) {
    for node in &workflow.nodes {
        let Some(branch) = node.as_branch() else {
            continue;
        };
        out.extend(
            branch
                .conditions
                .iter()
                .filter(|c| !defined.contains(&c.variable))
                .map(|c| Violation::UndefinedVariable {
                    node_id: node.id.clone(),
                    condition_id: c.id.clone(),
                    variable: c.variable.clone(),
                }),
        );
    }
}

pub(super) fn incomplete_computations(workflow: &Workflow, out: &mut Vec<Violation>) {
    for node in &workflow.nodes {
        let NodeKind::Computation(data) = &node.kind else {
            continue;
        };
        let missing = match (data.formula.is_empty(), data.output_variable.is_empty()) {
            (false, true) => MissingPart::OutputVariable,
            (true, false) => MissingPart::Formula,
            // Both empty means not configured yet; both set is complete.
            _ => continue,
        };
        out.push(Violation::IncompleteComputation {
            node_id: node.id.clone(),
            name: node.display_name().to_string(),
            missing,
        });
    }
}

pub(super) fn end_node_presence(workflow: &Workflow, out: &mut Vec<Violation>) {
    if workflow.nodes_of_type(NodeType::End).next().is_none() {
        out.push(Violation::NoEndNode);
    }
}

//! Variable flow: which names the workflow produces, and where.
//!
//! Avatar steps produce their `variableName`, computations their `outputVariable`.
//! Names are not unique across producers; [`producers`] lists every node behind a name.

use crate::model::{Node, NodeKind, Workflow};
use ahash::AHashSet;

/// The variable a node produces, if it produces a non-empty one.
pub fn produced_variable(node: &Node) -> Option<&str> {
    let name = match &node.kind {
        NodeKind::AvatarStep(data) => data.variable_name.as_deref()?,
        NodeKind::Computation(data) => data.output_variable.as_str(),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}

/// Every variable name produced anywhere in the workflow.
pub fn defined_variables(workflow: &Workflow) -> AHashSet<String> {
    defined_variables_in(&workflow.nodes)
}

/// Every variable name produced by `nodes`.
pub fn defined_variables_in(nodes: &[Node]) -> AHashSet<String> {
    nodes
        .iter()
        .filter_map(produced_variable)
        .map(str::to_string)
        .collect()
}

/// Ids of the nodes producing `name`, in node order.
pub fn producers<'a>(workflow: &'a Workflow, name: &str) -> Vec<&'a str> {
    workflow
        .nodes
        .iter()
        .filter(|n| produced_variable(n) == Some(name))
        .map(|n| n.id.as_str())
        .collect()
}

use super::condition::Condition;
use super::edge::Edge;
use super::node::{Node, NodeType};

/// Name given to workflows that were not named explicitly.
pub const DEFAULT_WORKFLOW_NAME: &str = "Medical Intake Workflow";

/// A snapshot of the workflow graph: nodes and edges in insertion order.
///
/// This is the read side of the engine. Validation, variable resolution and export
/// operate on a `&Workflow`; mutation goes through [`crate::graph::WorkflowGraph`],
/// which owns one and keeps its invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct Workflow {
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORKFLOW_NAME.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl Workflow {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type() == node_type)
    }

    /// Edges pointing at `node_id`.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Edges leaving `node_id`.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// The edge leaving `node_id` through `handle`, if any.
    pub fn handle_edge(&self, node_id: &str, handle: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.leaves_through(node_id, handle))
    }

    /// The edge realizing condition `condition_id` of branch `branch_id`.
    pub fn condition_edge(&self, branch_id: &str, condition_id: &str) -> Option<&Edge> {
        self.handle_edge(branch_id, condition_id)
    }

    /// Where a condition currently leads, computed from the edge list rather than the cache.
    pub fn condition_target(&self, branch_id: &str, condition_id: &str) -> Option<&str> {
        self.condition_edge(branch_id, condition_id)
            .map(|e| e.target.as_str())
    }

    /// The condition an edge realizes, if it leaves a branch through a condition handle.
    pub fn edge_condition(&self, edge_id: &str) -> Option<&Condition> {
        let edge = self.edge(edge_id)?;
        let handle = edge.source_handle.as_deref()?;
        self.node(&edge.source)?.as_branch()?.condition(handle)
    }

    /// Label shown on a branch edge: the condition it realizes, rendered as `var op value`.
    pub fn edge_condition_label(&self, edge_id: &str) -> Option<String> {
        self.edge_condition(edge_id).map(Condition::summary)
    }
}

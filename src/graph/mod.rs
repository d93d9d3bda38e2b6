use crate::error::{ConversionError, EndpointRole, GraphError};
use crate::model::{
    Condition, ConditionPatch, Connection, Edge, IntoWorkflow, Node, NodeKind, NodePatch,
    NodeType, Position, Workflow,
};
use ahash::AHashSet;
use tracing::debug;

mod command;
pub mod ids;
pub(crate) mod sync;

pub use command::{Command, Outcome};
pub use ids::{IdGenerator, SequentialIds, TypedIds};

/// The graph store: owns a [`Workflow`] and is the only way to mutate it.
///
/// Every mutation either fully applies, with condition targets consistent with the
/// edge list, or is rejected with a [`GraphError`] before anything is written.
/// Operations on unknown ids are silent no-ops.
pub struct WorkflowGraph {
    workflow: Workflow,
    ids: Box<dyn IdGenerator>,
}

pub struct WorkflowGraphBuilder {
    name: Option<String>,
    ids: Box<dyn IdGenerator>,
}

impl WorkflowGraphBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            ids: Box::new(SequentialIds::new()),
        }
    }

    /// Sets the workflow name reported in export metadata.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the default sequential id allocation.
    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn build(self) -> WorkflowGraph {
        let mut workflow = Workflow::default();
        if let Some(name) = self.name {
            workflow.name = name;
        }
        WorkflowGraph {
            workflow,
            ids: self.ids,
        }
    }

    /// Builds a store holding `source`, checking every invariant on the way in.
    ///
    /// Node and edge order is preserved. Condition targets are re-derived from the
    /// edges, whatever the source carried. A name set on the builder wins over the
    /// source's name.
    pub fn load(self, source: impl IntoWorkflow) -> Result<WorkflowGraph, ConversionError> {
        let incoming = source.into_workflow()?;
        let name = self.name.clone().unwrap_or(incoming.name);
        let mut graph = self.with_name(name).build();
        for node in incoming.nodes {
            graph.insert_node(node)?;
        }
        for edge in incoming.edges {
            graph.insert_edge(edge)?;
        }
        sync::resync_all(&mut graph.workflow);
        debug!(
            nodes = graph.workflow.nodes.len(),
            edges = graph.workflow.edges.len(),
            "workflow loaded"
        );
        Ok(graph)
    }
}

impl Default for WorkflowGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowGraph {
    pub fn new() -> Self {
        WorkflowGraphBuilder::new().build()
    }

    pub fn builder() -> WorkflowGraphBuilder {
        WorkflowGraphBuilder::new()
    }

    /// Loads an external workflow with default settings. See [`WorkflowGraphBuilder::load`].
    pub fn load(source: impl IntoWorkflow) -> Result<Self, ConversionError> {
        WorkflowGraphBuilder::new().load(source)
    }

    /// Read access to the current state.
    pub fn snapshot(&self) -> &Workflow {
        &self.workflow
    }

    /// Consumes the store, keeping only its data.
    pub fn into_workflow(self) -> Workflow {
        self.workflow
    }

    pub fn nodes(&self) -> &[Node] {
        &self.workflow.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.workflow.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.workflow.node(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.workflow.edge(id)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.workflow.name = name.into();
    }

    // --- Nodes ---

    /// Appends a node of `node_type` with its default payload and returns its fresh id.
    pub fn add_node(&mut self, node_type: NodeType, position: Position) -> String {
        let id = self.fresh_node_id(node_type);
        self.workflow
            .nodes
            .push(Node::new(id.clone(), position, NodeKind::default_for(node_type)));
        debug!(node = %id, %node_type, "node added");
        id
    }

    /// Appends a fully specified node, keeping its id.
    pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.workflow.contains_node(&node.id) {
            debug!(node = %node.id, "node insert rejected: duplicate id");
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        let is_branch = node.as_branch().is_some();
        self.workflow.nodes.push(node);
        if is_branch {
            sync::resync_branch(&mut self.workflow, &id);
        }
        Ok(())
    }

    /// Merges `patch` into the payload of node `id`.
    ///
    /// Replacing a branch's conditions also removes the edges of conditions that
    /// disappeared and re-derives every condition target.
    pub fn update_node_data(&mut self, id: &str, patch: NodePatch) {
        let Some(node) = self.workflow.node_mut(id) else {
            return;
        };
        let previous_conditions: Option<Vec<String>> = match (&node.kind, &patch.conditions) {
            (NodeKind::Branch(data), Some(_)) => {
                Some(data.conditions.iter().map(|c| c.id.clone()).collect())
            }
            _ => None,
        };
        patch.merge_into(&mut node.kind);

        if let Some(previous) = previous_conditions {
            let current: Vec<String> = node
                .as_branch()
                .map(|b| b.conditions.iter().map(|c| c.id.clone()).collect())
                .unwrap_or_default();
            let retired: Vec<String> = previous
                .into_iter()
                .filter(|c| !current.contains(c))
                .collect();
            self.detach_handles(id, &retired);
            sync::resync_branch(&mut self.workflow, id);
        }
        debug!(node = id, "node data updated");
    }

    /// Moves node `id` on the canvas.
    pub fn move_node(&mut self, id: &str, position: Position) {
        if let Some(node) = self.workflow.node_mut(id) {
            node.position = position;
        }
    }

    /// Picks the video category of avatar step `id`. The selected video is cleared,
    /// since it belonged to the previous category.
    pub fn select_category(&mut self, id: &str, category: impl Into<String>) {
        if let Some(NodeKind::AvatarStep(data)) = self.workflow.node_mut(id).map(|n| &mut n.kind)
        {
            data.category = category.into();
            data.video_id.clear();
        }
    }

    /// Removes node `id` and every edge incident to it.
    pub fn delete_node(&mut self, id: &str) {
        let Some(index) = self.workflow.nodes.iter().position(|n| n.id == id) else {
            return;
        };
        self.workflow.nodes.remove(index);
        let removed = self.take_edges(|e| e.is_incident_to(id));
        sync::resync_sources(&mut self.workflow, &removed);
        debug!(node = id, cascaded_edges = removed.len(), "node deleted");
    }

    // --- Branch conditions ---

    /// Appends an empty condition to branch `branch_id` and returns its id.
    pub fn add_condition(&mut self, branch_id: &str) -> Option<String> {
        self.workflow.node(branch_id)?.as_branch()?;
        let id = self.fresh_condition_id(branch_id);
        let branch = self.workflow.node_mut(branch_id)?.as_branch_mut()?;
        branch
            .conditions
            .push(Condition::new(id.clone(), "", Default::default(), ""));
        sync::resync_branch(&mut self.workflow, branch_id);
        debug!(branch = branch_id, condition = %id, "condition added");
        Some(id)
    }

    pub fn update_condition(&mut self, branch_id: &str, condition_id: &str, patch: ConditionPatch) {
        if let Some(condition) = self
            .workflow
            .node_mut(branch_id)
            .and_then(|n| n.as_branch_mut())
            .and_then(|b| b.condition_mut(condition_id))
        {
            patch.merge_into(condition);
        }
    }

    /// Removes a condition together with the edge realizing it.
    pub fn remove_condition(&mut self, branch_id: &str, condition_id: &str) {
        let Some(branch) = self
            .workflow
            .node_mut(branch_id)
            .and_then(|n| n.as_branch_mut())
        else {
            return;
        };
        let before = branch.conditions.len();
        branch.conditions.retain(|c| c.id != condition_id);
        if branch.conditions.len() == before {
            return;
        }
        self.detach_handles(branch_id, &[condition_id.to_string()]);
        sync::resync_branch(&mut self.workflow, branch_id);
        debug!(branch = branch_id, condition = condition_id, "condition removed");
    }

    // --- Edges ---

    /// Connects two nodes and returns the new edge's id.
    ///
    /// Rejected if an identical connection exists, if the source handle is already
    /// connected, or if either endpoint is unknown.
    pub fn add_edge(&mut self, connection: Connection) -> Result<String, GraphError> {
        let edge = connection.into_edge();
        self.check_edge(&edge, None)?;
        let id = edge.id.clone();
        let source = edge.source.clone();
        self.workflow.edges.push(edge);
        sync::resync_branch(&mut self.workflow, &source);
        debug!(edge = %id, "edge added");
        Ok(id)
    }

    /// Appends a fully specified edge, keeping its id. Same checks as [`Self::add_edge`].
    pub fn insert_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.check_edge(&edge, None)?;
        let source = edge.source.clone();
        self.workflow.edges.push(edge);
        sync::resync_branch(&mut self.workflow, &source);
        Ok(())
    }

    /// Removes edge `id`.
    pub fn delete_edge(&mut self, id: &str) {
        let removed = self.take_edges(|e| e.id == id);
        sync::resync_sources(&mut self.workflow, &removed);
        if !removed.is_empty() {
            debug!(edge = id, "edge deleted");
        }
    }

    /// Replaces edge `old_edge_id` with one built from `connection`, in place.
    ///
    /// Returns the new edge id, or `Ok(None)` if the old edge does not exist. Collisions
    /// with any edge other than the one being replaced are rejected before any write.
    pub fn reconnect_edge(
        &mut self,
        old_edge_id: &str,
        connection: Connection,
    ) -> Result<Option<String>, GraphError> {
        let Some(index) = self.workflow.edges.iter().position(|e| e.id == old_edge_id) else {
            return Ok(None);
        };
        let edge = connection.into_edge();
        self.check_edge(&edge, Some(old_edge_id))?;

        let new_id = edge.id.clone();
        let new_source = edge.source.clone();
        let old = std::mem::replace(&mut self.workflow.edges[index], edge);
        sync::resync_branch(&mut self.workflow, &old.source);
        if new_source != old.source {
            sync::resync_branch(&mut self.workflow, &new_source);
        }
        debug!(from = old_edge_id, to = %new_id, "edge reconnected");
        Ok(Some(new_id))
    }

    /// Applies a command object. Every mutation above is reachable through here.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, GraphError> {
        command::apply(self, command)
    }

    // --- Internals ---

    fn check_edge(&self, edge: &Edge, replacing: Option<&str>) -> Result<(), GraphError> {
        let others = || {
            self.workflow
                .edges
                .iter()
                .filter(move |e| Some(e.id.as_str()) != replacing)
        };
        if others().any(|e| e.id == edge.id) {
            debug!(edge = %edge.id, "edge rejected: duplicate id");
            return Err(GraphError::DuplicateEdge {
                edge_id: edge.id.clone(),
            });
        }
        if !self.workflow.contains_node(&edge.source) {
            return Err(GraphError::NodeNotFound {
                node_id: edge.source.clone(),
                role: EndpointRole::Source,
            });
        }
        if !self.workflow.contains_node(&edge.target) {
            return Err(GraphError::NodeNotFound {
                node_id: edge.target.clone(),
                role: EndpointRole::Target,
            });
        }
        if let Some(handle) = edge.source_handle.as_deref() {
            if let Some(existing) = others().find(|e| e.leaves_through(&edge.source, handle)) {
                debug!(edge = %edge.id, existing = %existing.id, "edge rejected: handle occupied");
                return Err(GraphError::HandleOccupied {
                    source_node_id: edge.source.clone(),
                    handle: handle.to_string(),
                    existing_edge_id: existing.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Removes and returns every edge matching `predicate`, preserving the order of the rest.
    fn take_edges(&mut self, predicate: impl Fn(&Edge) -> bool) -> Vec<Edge> {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.workflow.edges)
            .into_iter()
            .partition(|e| predicate(e));
        self.workflow.edges = kept;
        removed
    }

    /// Removes the edges leaving `node_id` through any of `handles`.
    fn detach_handles(&mut self, node_id: &str, handles: &[String]) {
        if handles.is_empty() {
            return;
        }
        let removed = self.take_edges(|e| {
            e.source == node_id
                && e.source_handle
                    .as_ref()
                    .is_some_and(|h| handles.contains(h))
        });
        if !removed.is_empty() {
            debug!(node = node_id, edges = removed.len(), "edges of retired conditions removed");
        }
    }

    fn fresh_node_id(&mut self, node_type: NodeType) -> String {
        fresh_id(
            || self.ids.node_id(node_type),
            |id| self.workflow.contains_node(id),
        )
    }

    fn fresh_condition_id(&mut self, branch_id: &str) -> String {
        let branch = self.workflow.node(branch_id).and_then(|n| n.as_branch());
        fresh_id(
            || self.ids.condition_id(),
            |id| branch.is_some_and(|b| b.condition(id).is_some()),
        )
    }
}

/// Asks `next` for ids until one is free.
///
/// Once the generator repeats a proposal, it is not asked again: the repeated id is
/// suffixed with `_2`, `_3`, ... until free.
fn fresh_id(mut next: impl FnMut() -> String, taken: impl Fn(&str) -> bool) -> String {
    let mut proposed = AHashSet::new();
    loop {
        let id = next();
        if !taken(&id) {
            return id;
        }
        if !proposed.insert(id.clone()) {
            let mut n = 2u64;
            loop {
                let candidate = format!("{}_{}", id, n);
                if !taken(&candidate) {
                    return candidate;
                }
                n += 1;
            }
        }
    }
}

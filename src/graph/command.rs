use super::WorkflowGraph;
use crate::error::GraphError;
use crate::model::{ConditionPatch, Connection, NodePatch, NodeType, Position};
use serde::{Deserialize, Serialize};

/// A single mutation of the graph, as a value.
///
/// Commands serialize as JSON objects tagged by `op`, e.g.
/// `{"op": "addEdge", "connection": {"source": "start", "target": "node_1"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    AddNode {
        node_type: NodeType,
        #[serde(default)]
        position: Position,
    },
    UpdateNodeData {
        id: String,
        patch: NodePatch,
    },
    MoveNode {
        id: String,
        position: Position,
    },
    DeleteNode {
        id: String,
    },
    AddEdge {
        connection: Connection,
    },
    DeleteEdge {
        id: String,
    },
    ReconnectEdge {
        edge_id: String,
        connection: Connection,
    },
    SelectCategory {
        id: String,
        category: String,
    },
    AddCondition {
        branch_id: String,
    },
    UpdateCondition {
        branch_id: String,
        condition_id: String,
        patch: ConditionPatch,
    },
    RemoveCondition {
        branch_id: String,
        condition_id: String,
    },
}

/// What applying a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NodeAdded(String),
    EdgeAdded(String),
    ConditionAdded(String),
    /// The command ran. For deletes and updates this includes the no-op on unknown ids.
    Applied,
    /// A reconnect or condition command named something that does not exist.
    Ignored,
}

pub(super) fn apply(graph: &mut WorkflowGraph, command: Command) -> Result<Outcome, GraphError> {
    let outcome = match command {
        Command::AddNode {
            node_type,
            position,
        } => Outcome::NodeAdded(graph.add_node(node_type, position)),
        Command::UpdateNodeData { id, patch } => {
            graph.update_node_data(&id, patch);
            Outcome::Applied
        }
        Command::MoveNode { id, position } => {
            graph.move_node(&id, position);
            Outcome::Applied
        }
        Command::DeleteNode { id } => {
            graph.delete_node(&id);
            Outcome::Applied
        }
        Command::AddEdge { connection } => Outcome::EdgeAdded(graph.add_edge(connection)?),
        Command::DeleteEdge { id } => {
            graph.delete_edge(&id);
            Outcome::Applied
        }
        Command::ReconnectEdge {
            edge_id,
            connection,
        } => graph
            .reconnect_edge(&edge_id, connection)?
            .map_or(Outcome::Ignored, Outcome::EdgeAdded),
        Command::SelectCategory { id, category } => {
            graph.select_category(&id, category);
            Outcome::Applied
        }
        Command::AddCondition { branch_id } => graph
            .add_condition(&branch_id)
            .map_or(Outcome::Ignored, Outcome::ConditionAdded),
        Command::UpdateCondition {
            branch_id,
            condition_id,
            patch,
        } => {
            graph.update_condition(&branch_id, &condition_id, patch);
            Outcome::Applied
        }
        Command::RemoveCondition {
            branch_id,
            condition_id,
        } => {
            graph.remove_condition(&branch_id, &condition_id);
            Outcome::Applied
        }
    };
    Ok(outcome)
}

//! The export document: the one wire format this crate guarantees.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "metadata": { "name": "...", "nodeCount": 9, "edgeCount": 10 },
//!   "steps": [ { "id", "video", "question", "inputType", "isMandatory", "variableName" } ],
//!   "nodes": [ { "id", "type", "position", "data" } ],
//!   "edges": [ { "id", "source", "target", "sourceHandle", "targetHandle" } ]
//! }
//! ```

use crate::error::{ConversionError, ExportError};
use crate::model::{Edge, InputType, IntoWorkflow, Node, NodeKind, Workflow};
use crate::validate::validate;
use serde::{Deserialize, Serialize};

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: String,
    pub metadata: Metadata,
    pub steps: Vec<Step>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
}

/// The flattened view of one avatar step, for consumers that only play the videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub video: String,
    pub question: String,
    pub input_type: InputType,
    pub is_mandatory: bool,
    #[serde(default)]
    pub variable_name: Option<String>,
}

/// Builds the export document for `workflow`.
///
/// This does not validate; see [`export_checked`] for the gated variant.
pub fn export_document(workflow: &Workflow) -> ExportDocument {
    let steps = workflow
        .nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::AvatarStep(data) => Some(Step {
                id: node.id.clone(),
                video: data.video_id.clone(),
                question: data.question_text.clone(),
                input_type: data.input_type,
                is_mandatory: data.is_mandatory,
                variable_name: data.variable_name.clone(),
            }),
            _ => None,
        })
        .collect();

    ExportDocument {
        version: EXPORT_VERSION.to_string(),
        metadata: Metadata {
            name: workflow.name.clone(),
            node_count: workflow.nodes.len(),
            edge_count: workflow.edges.len(),
        },
        steps,
        nodes: workflow.nodes.clone(),
        edges: workflow.edges.clone(),
    }
}

/// Exports `workflow` only if it has no guardrail violations.
pub fn export_checked(workflow: &Workflow) -> Result<ExportDocument, ExportError> {
    let violations = validate(workflow);
    if !violations.is_empty() {
        tracing::debug!(violations = violations.len(), "export blocked");
        return Err(ExportError::Blocked(violations));
    }
    Ok(export_document(workflow))
}

impl ExportDocument {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string(self).map_err(|e| ExportError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::Json(e.to_string()))
    }
}

impl IntoWorkflow for ExportDocument {
    /// Takes `nodes`, `edges` and `metadata.name`; `steps` and the counts are derived
    /// data and are ignored.
    fn into_workflow(self) -> Result<Workflow, ConversionError> {
        if self.version != EXPORT_VERSION {
            return Err(ConversionError::UnsupportedVersion(self.version));
        }
        Ok(Workflow {
            name: self.metadata.name,
            nodes: self.nodes,
            edges: self.edges,
        })
    }
}

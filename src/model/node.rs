use super::condition::Condition;
use crate::error::ConversionError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canvas position of a node. Carried through untouched; it has no meaning to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The discriminant of a node's kind, as it appears in the `type` field on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Start,
    End,
    AvatarStep,
    Branch,
    Computation,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Start,
        NodeType::End,
        NodeType::AvatarStep,
        NodeType::Branch,
        NodeType::Computation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::AvatarStep => "avatarStep",
            NodeType::Branch => "branch",
            NodeType::Computation => "computation",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

/// How the patient answers an avatar step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Choice,
    Number,
    Text,
    None,
}

/// Payload of `Start` and `End` nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelData {
    #[serde(default)]
    pub label: String,
}

/// Payload of an avatar step: a video shown to the patient and the question it asks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarStepData {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default)]
    pub is_mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BranchData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl BranchData {
    pub fn condition(&self, condition_id: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == condition_id)
    }

    pub fn condition_mut(&mut self, condition_id: &str) -> Option<&mut Condition> {
        self.conditions.iter_mut().find(|c| c.id == condition_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputationData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub output_variable: String,
}

/// A node's kind together with its payload. Serializes as the bare payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeKind {
    Start(LabelData),
    End(LabelData),
    AvatarStep(AvatarStepData),
    Branch(BranchData),
    Computation(ComputationData),
}

impl NodeKind {
    /// The payload a freshly added node of `node_type` starts with.
    pub fn default_for(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Start | NodeType::End => {
                let data = LabelData {
                    label: format!("{} node", node_type),
                };
                if node_type == NodeType::Start {
                    NodeKind::Start(data)
                } else {
                    NodeKind::End(data)
                }
            }
            NodeType::AvatarStep => NodeKind::AvatarStep(AvatarStepData::default()),
            NodeType::Branch => NodeKind::Branch(BranchData {
                label: "Branch Node".to_string(),
                conditions: Vec::new(),
            }),
            NodeType::Computation => NodeKind::Computation(ComputationData {
                label: "Computation Node".to_string(),
                ..Default::default()
            }),
        }
    }

    /// Rebuilds a kind from its type tag and a raw JSON payload.
    pub fn from_data(
        node_id: &str,
        node_type: NodeType,
        data: serde_json::Value,
    ) -> Result<Self, ConversionError> {
        let invalid = |e: serde_json::Error| ConversionError::InvalidPayload {
            node_id: node_id.to_string(),
            message: e.to_string(),
        };
        // A missing payload is read as an empty object so every field falls back to its default.
        let data = if data.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            data
        };
        let kind = match node_type {
            NodeType::Start => NodeKind::Start(serde_json::from_value(data).map_err(invalid)?),
            NodeType::End => NodeKind::End(serde_json::from_value(data).map_err(invalid)?),
            NodeType::AvatarStep => {
                NodeKind::AvatarStep(serde_json::from_value(data).map_err(invalid)?)
            }
            NodeType::Branch => NodeKind::Branch(serde_json::from_value(data).map_err(invalid)?),
            NodeType::Computation => {
                NodeKind::Computation(serde_json::from_value(data).map_err(invalid)?)
            }
        };
        Ok(kind)
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Start(_) => NodeType::Start,
            NodeKind::End(_) => NodeType::End,
            NodeKind::AvatarStep(_) => NodeType::AvatarStep,
            NodeKind::Branch(_) => NodeType::Branch,
            NodeKind::Computation(_) => NodeType::Computation,
        }
    }

    /// The `label` field, for the kinds that carry one.
    pub fn label(&self) -> Option<&str> {
        match self {
            NodeKind::Start(d) | NodeKind::End(d) => Some(&d.label),
            NodeKind::Branch(d) => Some(&d.label),
            NodeKind::Computation(d) => Some(&d.label),
            NodeKind::AvatarStep(_) => None,
        }
    }
}

/// A step of the workflow graph.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct Node {
    pub id: String,
    pub position: Position,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Position, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position,
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// The name used when reporting on this node: its label if non-empty, else its id.
    pub fn display_name(&self) -> &str {
        match self.kind.label() {
            Some(label) if !label.is_empty() => label,
            _ => &self.id,
        }
    }

    pub fn as_branch(&self) -> Option<&BranchData> {
        match &self.kind {
            NodeKind::Branch(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_branch_mut(&mut self) -> Option<&mut BranchData> {
        match &mut self.kind {
            NodeKind::Branch(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_avatar_step(&self) -> Option<&AvatarStepData> {
        match &self.kind {
            NodeKind::AvatarStep(data) => Some(data),
            _ => None,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.node_type())?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("data", &self.kind)?;
        state.end()
    }
}

/// The `{ id, type, position, data }` wire shape, before its payload is interpreted.
#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: serde_json::Value,
}

impl TryFrom<RawNode> for Node {
    type Error = ConversionError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let node_type: NodeType =
            raw.node_type
                .parse()
                .map_err(|_| ConversionError::UnknownNodeType {
                    node_id: raw.id.clone(),
                    type_name: raw.node_type.clone(),
                })?;
        let kind = NodeKind::from_data(&raw.id, node_type, raw.data)?;
        Ok(Node {
            id: raw.id,
            position: raw.position,
            kind,
        })
    }
}

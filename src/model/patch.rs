use super::condition::Condition;
use super::node::{InputType, NodeKind};
use serde::{Deserialize, Serialize};

/// A partial node payload. Present fields overwrite the node's fields of the same name;
/// fields the node's kind does not carry are ignored.
///
/// Deserializes from the camelCase partial objects the editor panels send, e.g.
/// `{"videoId": "vid_height"}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub category: Option<String>,
    pub video_id: Option<String>,
    pub question_text: Option<String>,
    pub input_type: Option<InputType>,
    pub is_mandatory: Option<bool>,
    pub variable_name: Option<String>,
    pub conditions: Option<Vec<Condition>>,
    pub formula: Option<String>,
    pub output_variable: Option<String>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn video_id(video_id: impl Into<String>) -> Self {
        Self {
            video_id: Some(video_id.into()),
            ..Default::default()
        }
    }

    pub fn variable_name(name: impl Into<String>) -> Self {
        Self {
            variable_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn conditions(conditions: Vec<Condition>) -> Self {
        Self {
            conditions: Some(conditions),
            ..Default::default()
        }
    }

    pub fn formula(formula: impl Into<String>) -> Self {
        Self {
            formula: Some(formula.into()),
            ..Default::default()
        }
    }

    pub fn output_variable(name: impl Into<String>) -> Self {
        Self {
            output_variable: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the present fields into `kind`.
    pub(crate) fn merge_into(self, kind: &mut NodeKind) {
        match kind {
            NodeKind::Start(data) | NodeKind::End(data) => {
                if let Some(label) = self.label {
                    data.label = label;
                }
            }
            NodeKind::AvatarStep(data) => {
                if let Some(category) = self.category {
                    data.category = category;
                }
                if let Some(video_id) = self.video_id {
                    data.video_id = video_id;
                }
                if let Some(question_text) = self.question_text {
                    data.question_text = question_text;
                }
                if let Some(input_type) = self.input_type {
                    data.input_type = input_type;
                }
                if let Some(is_mandatory) = self.is_mandatory {
                    data.is_mandatory = is_mandatory;
                }
                if let Some(variable_name) = self.variable_name {
                    data.variable_name = Some(variable_name);
                }
            }
            NodeKind::Branch(data) => {
                if let Some(label) = self.label {
                    data.label = label;
                }
                if let Some(conditions) = self.conditions {
                    data.conditions = conditions;
                }
            }
            NodeKind::Computation(data) => {
                if let Some(label) = self.label {
                    data.label = label;
                }
                if let Some(formula) = self.formula {
                    data.formula = formula;
                }
                if let Some(output_variable) = self.output_variable {
                    data.output_variable = output_variable;
                }
            }
        }
    }
}

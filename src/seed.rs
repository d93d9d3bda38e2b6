//! The stock BMI intake workflow new editors start from.
//!
//! ```text
//! start → height → weight → compute BMI → BMI branch ─┬─ bmi < 15  → underweight ─┐
//!                                                     ├─ bmi > 30  → overweight  ─┼→ end
//!                                                     └─ bmi >= 15 → normal      ─┘
//! ```

use crate::error::ConversionError;
use crate::graph::WorkflowGraph;
use crate::model::{
    AvatarStepData, BranchData, ComputationData, Condition, Edge, InputType, LabelData, Node,
    NodeKind, Operator, Position, Workflow,
};

struct Avatar<'a> {
    id: &'a str,
    at: (f64, f64),
    category: &'a str,
    video: &'a str,
    question: &'a str,
    input_type: InputType,
    variable: Option<&'a str>,
}

impl Avatar<'_> {
    fn into_node(self) -> Node {
        Node::new(
            self.id,
            Position::new(self.at.0, self.at.1),
            NodeKind::AvatarStep(AvatarStepData {
                category: self.category.to_string(),
                video_id: self.video.to_string(),
                question_text: self.question.to_string(),
                input_type: self.input_type,
                is_mandatory: self.variable.is_some(),
                variable_name: self.variable.map(str::to_string),
            }),
        )
    }
}

fn outcome(id: &str, x: f64, category: &str, video: &str, question: &str) -> Node {
    Avatar {
        id,
        at: (x, 1410.0),
        category,
        video,
        question,
        input_type: InputType::None,
        variable: None,
    }
    .into_node()
}

fn bmi_condition(id: &str, operator: Operator, threshold: f64, target: &str) -> Condition {
    let mut condition = Condition::new(id, "bmi", operator, threshold);
    condition.target_node_id = target.to_string();
    condition
}

/// The seed workflow as plain data. Condition targets agree with the edges.
pub fn bmi_intake_workflow() -> Workflow {
    let nodes = vec![
        Node::new(
            "start",
            Position::new(500.0, 100.0),
            NodeKind::Start(LabelData {
                label: "Start".to_string(),
            }),
        ),
        Avatar {
            id: "avatar_height",
            at: (45.0, 255.0),
            category: "vitals",
            video: "vid_height",
            question: "What is your height?",
            input_type: InputType::Number,
            variable: Some("height"),
        }
        .into_node(),
        Avatar {
            id: "avatar_weight",
            at: (480.0, 300.0),
            category: "vitals",
            video: "vid_weight",
            question: "What is your weight?",
            input_type: InputType::Number,
            variable: Some("weight"),
        }
        .into_node(),
        Node::new(
            "compute_bmi",
            Position::new(930.0, 330.0),
            NodeKind::Computation(ComputationData {
                label: "Calculate BMI".to_string(),
                formula: "weight / (height * height)".to_string(),
                output_variable: "bmi".to_string(),
            }),
        ),
        Node::new(
            "branch_bmi",
            Position::new(975.0, 825.0),
            NodeKind::Branch(BranchData {
                label: "BMI Classification".to_string(),
                conditions: vec![
                    bmi_condition(
                        "condition_underweight",
                        Operator::SmallerThan,
                        15.0,
                        "avatar_underweight",
                    ),
                    bmi_condition(
                        "condition_overweight",
                        Operator::GreaterThan,
                        30.0,
                        "avatar_overweight",
                    ),
                    bmi_condition(
                        "condition_normal",
                        Operator::GreaterThanOrEqual,
                        15.0,
                        "avatar_normal",
                    ),
                ],
            }),
        ),
        outcome(
            "avatar_underweight",
            585.0,
            "symptoms",
            "vid_pain",
            "You are underweight. Please consult with a healthcare provider.",
        ),
        outcome(
            "avatar_overweight",
            930.0,
            "symptoms",
            "vid_headache",
            "You are overweight. Please consult with a healthcare provider.",
        ),
        outcome(
            "avatar_normal",
            1275.0,
            "onboarding",
            "vid_welcome",
            "Your BMI is within normal range.",
        ),
        Node::new(
            "end",
            Position::new(1035.0, 2025.0),
            NodeKind::End(LabelData {
                label: "End".to_string(),
            }),
        ),
    ];

    let edges = vec![
        Edge::new("edge_start_height", "start", "avatar_height"),
        Edge::new("edge_height_weight", "avatar_height", "avatar_weight"),
        Edge::new("edge_weight_compute", "avatar_weight", "compute_bmi"),
        Edge::new("edge_compute_branch", "compute_bmi", "branch_bmi"),
        Edge::new("edge_branch_underweight", "branch_bmi", "avatar_underweight")
            .with_source_handle("condition_underweight"),
        Edge::new("edge_branch_overweight", "branch_bmi", "avatar_overweight")
            .with_source_handle("condition_overweight"),
        Edge::new("edge_branch_normal", "branch_bmi", "avatar_normal")
            .with_source_handle("condition_normal"),
        Edge::new("edge_underweight_end", "avatar_underweight", "end"),
        Edge::new("edge_overweight_end", "avatar_overweight", "end"),
        Edge::new("edge_normal_end", "avatar_normal", "end"),
    ];

    Workflow {
        nodes,
        edges,
        ..Default::default()
    }
}

/// The seed workflow loaded into a fresh store.
pub fn bmi_intake() -> Result<WorkflowGraph, ConversionError> {
    WorkflowGraph::load(bmi_intake_workflow())
}

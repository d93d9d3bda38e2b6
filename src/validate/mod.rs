//! Guardrail validation.
//!
//! [`validate`] runs every rule in a fixed order over a workflow snapshot and returns
//! the violations found. Violations are advisory data; whether they block anything
//! is the caller's decision.

use crate::model::Workflow;
use crate::variables::defined_variables;
use std::fmt;

mod rules;

/// Which half of a computation is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingPart {
    OutputVariable,
    Formula,
}

/// A graph state that should block export.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Violation {
    /// A non-start node that nothing connects into.
    Orphan { node_id: String, name: String },
    /// An avatar step without a selected video.
    MissingVideo { node_id: String, name: String },
    /// A branch condition reading a variable no node produces.
    UndefinedVariable {
        node_id: String,
        condition_id: String,
        variable: String,
    },
    /// A computation with a formula but no output, or an output but no formula.
    IncompleteComputation {
        node_id: String,
        name: String,
        missing: MissingPart,
    },
    /// The workflow has no end node at all.
    NoEndNode,
}

/// The fieldless discriminant of a [`Violation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViolationKind {
    Orphan,
    MissingVideo,
    UndefinedVariable,
    IncompleteComputation,
    NoEndNode,
}

impl Violation {
    pub fn kind(&self) -> ViolationKind {
        match self {
            Violation::Orphan { .. } => ViolationKind::Orphan,
            Violation::MissingVideo { .. } => ViolationKind::MissingVideo,
            Violation::UndefinedVariable { .. } => ViolationKind::UndefinedVariable,
            Violation::IncompleteComputation { .. } => ViolationKind::IncompleteComputation,
            Violation::NoEndNode => ViolationKind::NoEndNode,
        }
    }

    /// The node the violation is about. `None` for workflow-level violations.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Violation::Orphan { node_id, .. }
            | Violation::MissingVideo { node_id, .. }
            | Violation::UndefinedVariable { node_id, .. }
            | Violation::IncompleteComputation { node_id, .. } => Some(node_id),
            Violation::NoEndNode => None,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Orphan { name, .. } => {
                write!(f, "Node \"{}\" has no incoming connections", name)
            }
            Violation::MissingVideo { name, .. } => {
                write!(f, "Avatar step \"{}\" is missing a video selection", name)
            }
            Violation::UndefinedVariable { variable, .. } => {
                write!(f, "Branch node uses undefined variable \"{}\"", variable)
            }
            Violation::IncompleteComputation {
                name,
                missing: MissingPart::OutputVariable,
                ..
            } => write!(
                f,
                "Computation node \"{}\" is missing output variable name",
                name
            ),
            Violation::IncompleteComputation {
                name,
                missing: MissingPart::Formula,
                ..
            } => write!(f, "Computation node \"{}\" is missing formula", name),
            Violation::NoEndNode => write!(f, "Workflow must have at least one End node"),
        }
    }
}

/// Runs every guardrail rule over `workflow`.
///
/// Rules run in a fixed order (orphans, missing videos, undefined variables,
/// incomplete computations, end-node presence), each walking nodes in workflow order,
/// so the same snapshot always yields the same list.
pub fn validate(workflow: &Workflow) -> Vec<Violation> {
    let defined = defined_variables(workflow);
    let mut violations = Vec::new();
    rules::orphans(workflow, &mut violations);
    rules::missing_videos(workflow, &mut violations);
    rules::undefined_variables(workflow, &defined, &mut violations);
    rules::incomplete_computations(workflow, &mut violations);
    rules::end_node_presence(workflow, &mut violations);
    tracing::debug!(
        nodes = workflow.nodes.len(),
        violations = violations.len(),
        "workflow validated"
    );
    violations
}

/// [`validate`], rendered as messages.
pub fn validate_messages(workflow: &Workflow) -> Vec<String> {
    validate(workflow).iter().map(ToString::to_string).collect()
}

//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! intakeflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use intakeflow::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let graph = WorkflowGraph::load(ExportDocument::from_json(&json)?)?;
//!
//! let violations = validate(graph.snapshot());
//! println!("{} violation(s)", violations.len());
//! # Ok(())
//! # }
//! ```

// Store and commands
pub use crate::graph::{
    Command, IdGenerator, Outcome, SequentialIds, TypedIds, WorkflowGraph, WorkflowGraphBuilder,
};

// Data model
pub use crate::model::{
    AvatarStepData, BranchData, ComputationData, Condition, ConditionPatch, ConditionValue,
    Connection, Edge, InputType, IntoWorkflow, LabelData, Node, NodeKind, NodePatch, NodeType,
    Operator, Position, Workflow,
};

// Read side
pub use crate::export::{ExportDocument, Step, export_checked, export_document};
pub use crate::validate::{MissingPart, Violation, ViolationKind, validate, validate_messages};
pub use crate::variables::{defined_variables, defined_variables_in, producers};

// Collaborators
pub use crate::library::{Video, VideoCategory, VideoLibrary};

// Error types
pub use crate::error::{ConversionError, ExportError, GraphError};

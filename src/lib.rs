//! # intakeflow - Clinical-Intake Workflow Graph Engine
//!
//! **intakeflow** is the engine behind a branching clinical-intake editor. A workflow is
//! a directed graph of typed steps: avatar videos asking the patient questions,
//! computations deriving new values, and branches routing on those values. The engine
//! owns the graph, keeps branch conditions and edges in agreement, checks the graph
//! against a set of guardrails, and exports it as a versioned JSON document.
//!
//! Rendering, layout and file delivery are left to the host. The engine consumes
//! typed mutations and produces data.
//!
//! ## Core Workflow
//!
//! 1.  **Author**: Mutate a [`graph::WorkflowGraph`] through its operations, or by
//!     applying [`graph::Command`] values.
//! 2.  **Validate**: Run [`validate::validate`] on the graph's snapshot to collect guardrail
//!     violations.
//! 3.  **Export**: Produce an [`export::ExportDocument`] with [`export::export_checked`],
//!     which refuses while violations remain.
//! 4.  **Reload**: Anything implementing [`model::IntoWorkflow`], including an export
//!     document, can be loaded back into a store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intakeflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = WorkflowGraph::builder().with_name("Fever triage").build();
//!
//!     let start = graph.add_node(NodeType::Start, Position::new(0.0, 0.0));
//!     let temp = graph.add_node(NodeType::AvatarStep, Position::new(0.0, 150.0));
//!     graph.update_node_data(&temp, NodePatch {
//!         video_id: Some("vid_temp".to_string()),
//!         question_text: Some("What is your temperature?".to_string()),
//!         variable_name: Some("temperature".to_string()),
//!         ..Default::default()
//!     });
//!     let end = graph.add_node(NodeType::End, Position::new(0.0, 300.0));
//!
//!     graph.add_edge(Connection::new(&start, &temp))?;
//!     graph.add_edge(Connection::new(&temp, &end))?;
//!
//!     for violation in validate(graph.snapshot()) {
//!         println!("-> {}", violation);
//!     }
//!
//!     let document = export_checked(graph.snapshot())?;
//!     println!("{}", document.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod export;
pub mod graph;
pub mod library;
pub mod model;
pub mod prelude;
pub mod seed;
pub mod validate;
pub mod variables;

#[cfg(feature = "python-bindings")]
mod python;

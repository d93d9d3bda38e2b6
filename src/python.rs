use crate::export::{ExportDocument, export_checked, export_document};
use crate::graph::{Command, WorkflowGraph};
use crate::model::{Connection, NodePatch, NodeType, Position};
use crate::seed;
use crate::validate::validate_messages;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn value_error(e: impl ToString) -> PyErr {
    PyErr::new::<PyValueError, _>(e.to_string())
}

/// An editable clinical-intake workflow graph.
///
/// Every mutation keeps branch conditions consistent with the graph's edges.
/// Unknown ids are ignored; conflicting connections raise.
#[pyclass(name = "WorkflowEditor")]
struct WorkflowEditorPy {
    graph: WorkflowGraph,
}

#[pymethods]
impl WorkflowEditorPy {
    /// Creates an editor.
    ///
    /// Args:
    ///     seed (bool): Start from the stock BMI intake workflow instead of an
    ///         empty graph.
    ///
    /// Raises:
    ///     ValueError: If the seed workflow fails to load.
    #[new]
    #[pyo3(signature = (seed = false))]
    fn new(seed: bool) -> PyResult<Self> {
        let graph = if seed {
            seed::bmi_intake().map_err(value_error)?
        } else {
            WorkflowGraph::new()
        };
        Ok(Self { graph })
    }

    /// Loads an editor from an export document JSON string.
    ///
    /// Raises:
    ///     ValueError: If the JSON is malformed or breaks a graph invariant.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let document = ExportDocument::from_json(json).map_err(value_error)?;
        let graph = WorkflowGraph::load(document).map_err(value_error)?;
        Ok(Self { graph })
    }

    /// Adds a node and returns its id. `node_type` is one of "start", "end",
    /// "avatarStep", "branch" or "computation".
    #[pyo3(signature = (node_type, x = 0.0, y = 0.0))]
    fn add_node(&mut self, node_type: &str, x: f64, y: f64) -> PyResult<String> {
        let node_type: NodeType = node_type.parse().map_err(value_error)?;
        Ok(self.graph.add_node(node_type, Position::new(x, y)))
    }

    /// Merges a camelCase JSON object of fields into a node's data.
    fn update_node(&mut self, id: &str, patch_json: &str) -> PyResult<()> {
        let patch: NodePatch = serde_json::from_str(patch_json).map_err(value_error)?;
        self.graph.update_node_data(id, patch);
        Ok(())
    }

    fn delete_node(&mut self, id: &str) {
        self.graph.delete_node(id);
    }

    /// Connects two nodes and returns the new edge id.
    ///
    /// Raises:
    ///     ValueError: If the connection already exists, the source handle is
    ///         taken, or an endpoint is unknown.
    #[pyo3(signature = (source, target, source_handle = None, target_handle = None))]
    fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> PyResult<String> {
        let connection = Connection {
            source: source.to_string(),
            target: target.to_string(),
            source_handle,
            target_handle,
        };
        self.graph.add_edge(connection).map_err(value_error)
    }

    fn delete_edge(&mut self, id: &str) {
        self.graph.delete_edge(id);
    }

    /// Applies a JSON command object, e.g. `{"op": "deleteNode", "id": "node_1"}`.
    fn apply(&mut self, command_json: &str) -> PyResult<()> {
        let command: Command = serde_json::from_str(command_json).map_err(value_error)?;
        self.graph.apply(command).map_err(value_error)?;
        Ok(())
    }

    /// Returns the guardrail violation messages, in rule order.
    fn validate(&self) -> Vec<String> {
        validate_messages(self.graph.snapshot())
    }

    /// Returns the export document as pretty JSON.
    ///
    /// Args:
    ///     force (bool): Export even when guardrail violations remain.
    ///
    /// Raises:
    ///     RuntimeError: If violations remain and `force` is false.
    #[pyo3(signature = (force = false))]
    fn export_json(&self, force: bool) -> PyResult<String> {
        let document = if force {
            export_document(self.graph.snapshot())
        } else {
            export_checked(self.graph.snapshot())
                .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))?
        };
        document
            .to_json_pretty()
            .map_err(|e| PyErr::new::<PyRuntimeError, _>(e.to_string()))
    }
}

/// Clinical-intake workflow graph engine.
///
/// This module provides Python bindings to the intakeflow Rust library: an
/// editable workflow graph with guardrail validation and JSON export.
#[pymodule]
fn intakeflow(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<WorkflowEditorPy>()?;
    Ok(())
}

use super::workflow::Workflow;
use crate::error::ConversionError;

/// A trait for external workflow formats that can be converted into a `Workflow`.
///
/// This is the extension point for loading workflows authored elsewhere. The export
/// document implements it, so anything exported by this crate can be loaded back.
///
/// # Example
///
/// ```rust,no_run
/// use intakeflow::prelude::*;
///
/// // 1. Your own format.
/// struct Questionnaire { questions: Vec<(String, String)> }
///
/// // 2. Translate it into nodes and edges.
/// impl IntoWorkflow for Questionnaire {
///     fn into_workflow(self) -> Result<Workflow, ConversionError> {
///         let mut workflow = Workflow::default();
///         for (id, text) in self.questions {
///             let data = AvatarStepData { question_text: text, ..Default::default() };
///             workflow.nodes.push(Node::new(id, Position::default(), NodeKind::AvatarStep(data)));
///         }
///         Ok(workflow)
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a workflow snapshot.
    fn into_workflow(self) -> Result<Workflow, ConversionError>;
}

impl IntoWorkflow for Workflow {
    fn into_workflow(self) -> Result<Workflow, ConversionError> {
        Ok(self)
    }
}

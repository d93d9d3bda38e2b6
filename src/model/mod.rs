pub mod condition;
pub mod conversion;
pub mod edge;
pub mod node;
pub mod patch;
pub mod workflow;

pub use condition::*;
pub use conversion::*;
pub use edge::*;
pub use node::*;
pub use patch::*;
pub use workflow::*;

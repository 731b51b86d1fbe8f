pub mod image;
pub mod prompt;
pub mod render;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod workflow;

pub use workflow::{CycleSnapshot, WorkflowController, WorkflowState};

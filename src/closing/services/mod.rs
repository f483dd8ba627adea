//! Application services for closing workflow orchestration.

mod generator;
mod orchestrator;
mod progress;
mod requirements;

pub use generator::TaskGenerator;
pub use orchestrator::{CaseOrchestrator, CaseWorkflowError, CaseWorkflowResult};
pub use progress::{CaseProgress, ProgressTracker, StageProgress, StageStatus};
pub use requirements::{AdvanceCheck, RequirementCheckError, RequirementChecker};

mod flow;
mod progress;
mod workflow;

// Public API of the survey subsystem.
pub use flow::{NavButtons, SurveyFlow, SurveyPhase};
pub use progress::{ProgressConfig, SyntheticProgress};
pub use workflow::SurveyLoopService;

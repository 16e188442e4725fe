// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod command;
mod orchestrator;
mod progress;
pub mod runner;
mod stage;

pub use command::StageInvocation;
pub use orchestrator::PipelineOrchestrator;
pub use progress::{PipelineReport, ProgressTracker, StageOutcome, StageReport};
pub use runner::{ProcessRunner, ToolExit, ToolRunner};
pub use stage::{Stage, StageSelection};

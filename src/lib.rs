// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod layout;
pub mod pipeline;
pub mod utils;

pub use cli::Cli;
pub use config::{Config, PipelineConfig, ToolchainConfig};
pub use error::{PipelineError, Result};
pub use exporter::json::{JsonExporter, RunManifest, StageEntry};
pub use layout::ProjectLayout;
pub use pipeline::{
    PipelineOrchestrator, PipelineReport, ProcessRunner, ProgressTracker, Stage, StageInvocation,
    StageOutcome, StageReport, StageSelection, ToolExit, ToolRunner,
};
pub use utils::{StageTimer, Validator, format_duration};

// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::pipeline::Stage;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Stage {stage} could not launch {program}: {source}")]
    Spawn {
        stage: Stage,
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Stage {stage} failed: external tool {}", describe_exit(.code))]
    ToolFailure { stage: Stage, code: Option<i32> },

    #[error("Stage {stage} failed: expected output {path} is missing or empty")]
    MissingOutput { stage: Stage, path: PathBuf },

    #[error("Stage {stage} aborted: {reason}")]
    StageAborted { stage: Stage, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// The stage a failure is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Spawn { stage, .. }
            | Self::ToolFailure { stage, .. }
            | Self::MissingOutput { stage, .. }
            | Self::StageAborted { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failure_names_stage() {
        let err = PipelineError::ToolFailure {
            stage: Stage::ComputePairs,
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Stage compute_pairs failed: external tool exited with status 2"
        );
        assert_eq!(err.stage(), Some(Stage::ComputePairs));
    }

    #[test]
    fn test_signal_termination_message() {
        let err = PipelineError::ToolFailure {
            stage: Stage::Reconstruct,
            code: None,
        };
        assert!(err.to_string().contains("terminated by a signal"));
    }

    #[test]
    fn test_config_error_has_no_stage() {
        assert!(PipelineError::Config("bad".into()).stage().is_none());
    }
}

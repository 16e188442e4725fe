// file: src/exporter/json.rs
// description: json run report written next to the reconstruction project

use crate::error::{PipelineError, Result};
use crate::layout::ProjectLayout;
use crate::pipeline::{PipelineReport, StageOutcome, StageReport};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const REPORT_FILE: &str = "pipeline_report.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RunManifest {
    pub generated_at: String,
    pub input_dir: String,
    pub output_dir: String,
    pub from_stage: String,
    pub to_stage: String,
    pub succeeded: bool,
    pub total_elapsed_ms: u64,
    pub stages: Vec<StageEntry>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StageEntry {
    pub index: usize,
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub elapsed_ms: u64,
}

impl From<&StageReport> for StageEntry {
    fn from(report: &StageReport) -> Self {
        let (exit_code, missing_output, reason) = match &report.outcome {
            StageOutcome::Success => (Some(0), None, None),
            StageOutcome::ToolFailure { code } => (*code, None, None),
            StageOutcome::MissingOutput { path } => {
                (Some(0), Some(path.display().to_string()), None)
            }
            StageOutcome::PreflightFailure { reason } | StageOutcome::LaunchFailure { reason } => {
                (None, None, Some(reason.clone()))
            }
        };

        Self {
            index: report.stage.index(),
            name: report.stage.name().to_string(),
            status: report.outcome.status().to_string(),
            exit_code,
            missing_output,
            reason,
            elapsed_ms: report.elapsed.as_millis() as u64,
        }
    }
}

impl RunManifest {
    pub fn new(layout: &ProjectLayout, report: &PipelineReport) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            input_dir: layout.input_dir().display().to_string(),
            output_dir: layout.output_dir().display().to_string(),
            from_stage: report.selection.from().name().to_string(),
            to_stage: report.selection.to().name().to_string(),
            succeeded: report.succeeded(),
            total_elapsed_ms: report.duration.as_millis() as u64,
            stages: report.stages.iter().map(StageEntry::from).collect(),
        }
    }
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE)
    }

    /// Overwrites any report left by a previous run.
    pub fn export_report(&self, layout: &ProjectLayout, report: &PipelineReport) -> Result<PathBuf> {
        let manifest = RunManifest::new(layout, report);
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;

        let path = self.report_path();
        fs::write(&path, json).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;

        info!(
            "Run report written to {} ({} stages recorded)",
            path.display(),
            manifest.stages.len()
        );
        Ok(path)
    }
}

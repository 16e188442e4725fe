// file: src/pipeline/progress.rs
// description: per-stage outcomes, run summaries and terminal progress for pipeline execution
// reference: uses indicatif for progress bars and tracks stage timings

use crate::error::{PipelineError, Result};
use crate::pipeline::{Stage, StageSelection};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// How a single stage ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Success,
    ToolFailure { code: Option<i32> },
    MissingOutput { path: PathBuf },
    /// A precondition failed, so the tool was never launched.
    PreflightFailure { reason: String },
    /// The tool could not be started.
    LaunchFailure { reason: String },
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success)
    }

    pub fn status(&self) -> &'static str {
        match self {
            StageOutcome::Success => "success",
            StageOutcome::ToolFailure { .. } => "tool_failure",
            StageOutcome::MissingOutput { .. } => "missing_output",
            StageOutcome::PreflightFailure { .. } => "preflight_failure",
            StageOutcome::LaunchFailure { .. } => "launch_failure",
        }
    }

    pub fn check(&self, stage: Stage) -> Result<()> {
        match self {
            StageOutcome::Success => Ok(()),
            StageOutcome::ToolFailure { code } => {
                Err(PipelineError::ToolFailure { stage, code: *code })
            }
            StageOutcome::MissingOutput { path } => Err(PipelineError::MissingOutput {
                stage,
                path: path.clone(),
            }),
            StageOutcome::PreflightFailure { reason } | StageOutcome::LaunchFailure { reason } => {
                Err(PipelineError::StageAborted {
                    stage,
                    reason: reason.clone(),
                })
            }
        }
    }

    /// Records an error that prevented a stage from running at all.
    pub fn from_error(err: &PipelineError) -> Self {
        match err {
            PipelineError::Spawn {
                program, source, ..
            } => StageOutcome::LaunchFailure {
                reason: format!("could not launch {}: {}", program.display(), source),
            },
            PipelineError::Validation(reason) => StageOutcome::PreflightFailure {
                reason: reason.clone(),
            },
            other => StageOutcome::LaunchFailure {
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub elapsed: Duration,
}

impl StageReport {
    pub fn check(&self) -> Result<()> {
        self.outcome.check(self.stage)
    }
}

/// Summary of one `execute` call. Holds every stage that was launched, in order;
/// a failed stage is always the last entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub selection: StageSelection,
    pub stages: Vec<StageReport>,
    pub duration: Duration,
}

impl PipelineReport {
    pub fn new(selection: StageSelection) -> Self {
        Self {
            selection,
            stages: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn push(&mut self, report: StageReport) {
        self.stages.push(report);
    }

    pub fn completed(&self) -> usize {
        self.stages
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed_stage(&self) -> Option<&StageReport> {
        self.stages.iter().find(|r| !r.outcome.is_success())
    }

    pub fn succeeded(&self) -> bool {
        self.failed_stage().is_none() && self.completed() == self.selection.len()
    }

    pub fn ensure_success(&self) -> Result<()> {
        if let Some(failed) = self.failed_stage() {
            return failed.check();
        }

        if self.completed() != self.selection.len() {
            return Err(PipelineError::Validation(format!(
                "only {} of {} requested stages ran",
                self.completed(),
                self.selection.len()
            )));
        }

        Ok(())
    }
}

/// Stage-level progress bar. Hidden when disabled so tests and piped output stay clean.
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(total_stages: usize, enabled: bool, colored: bool) -> Self {
        let bar = if enabled {
            create_progress_bar(total_stages as u64, colored)
        } else {
            ProgressBar::hidden()
        };

        Self { bar }
    }

    pub fn start_stage(&self, stage: Stage) {
        self.bar
            .set_message(format!("{}. {}", stage.index(), stage.title()));
    }

    pub fn complete_stage(&self) {
        self.bar.inc(1);
    }

    /// Hides the bar while `f` runs so the child tool can write to the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self, succeeded: bool) {
        if succeeded {
            self.bar.finish_with_message("Reconstruction pipeline complete");
        } else {
            self.bar.abandon_with_message("Reconstruction pipeline stopped");
        }
    }
}

fn create_progress_bar(total: u64, colored: bool) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if colored {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
    } else {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
                .expect("Failed to create progress bar template")
                .progress_chars("=>-"),
        );
    }
    bar
}

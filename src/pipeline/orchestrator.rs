// file: src/pipeline/orchestrator.rs
// description: drives the reconstruction tools stage by stage over a shared project layout
// reference: orchestrates the sequential structure-from-motion workflow

use crate::config::{Config, PipelineConfig, ToolchainConfig};
use crate::error::{PipelineError, Result};
use crate::layout::ProjectLayout;
use crate::pipeline::command::StageInvocation;
use crate::pipeline::progress::{PipelineReport, ProgressTracker, StageOutcome, StageReport};
use crate::pipeline::runner::{ProcessRunner, ToolRunner};
use crate::pipeline::{Stage, StageSelection};
use crate::utils::{StageTimer, Validator};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct PipelineOrchestrator<R = ProcessRunner> {
    layout: ProjectLayout,
    toolchain: ToolchainConfig,
    settings: PipelineConfig,
    runner: R,
    colored: bool,
}

impl PipelineOrchestrator<ProcessRunner> {
    /// Derives the project layout and creates the output directories that are missing.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: &Config,
    ) -> Result<Self> {
        Self::with_runner(input_dir, output_dir, config, ProcessRunner)
    }
}

impl<R: ToolRunner> PipelineOrchestrator<R> {
    pub fn with_runner(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: &Config,
        runner: R,
    ) -> Result<Self> {
        config.validate()?;

        let layout = ProjectLayout::derive(input_dir, output_dir, &config.toolchain);
        layout.ensure_directories()?;

        Ok(Self {
            layout,
            toolchain: config.toolchain.clone(),
            settings: config.pipeline.clone(),
            runner,
            colored: true,
        })
    }

    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn invocation(&self, stage: Stage) -> StageInvocation {
        StageInvocation::build(stage, &self.layout, &self.toolchain)
    }

    /// The command lines `run` would launch, without launching anything.
    pub fn plan(&self, selection: &StageSelection) -> Vec<StageInvocation> {
        selection.stages().map(|stage| self.invocation(stage)).collect()
    }

    pub fn list_images(&self) -> Result<StageReport> {
        self.run_stage(Stage::ListImages)
    }

    pub fn compute_features(&self) -> Result<StageReport> {
        self.run_stage(Stage::ComputeFeatures)
    }

    pub fn compute_pairs(&self) -> Result<StageReport> {
        self.run_stage(Stage::ComputePairs)
    }

    pub fn compute_matches(&self) -> Result<StageReport> {
        self.run_stage(Stage::ComputeMatches)
    }

    pub fn filter_matches(&self) -> Result<StageReport> {
        self.run_stage(Stage::FilterMatches)
    }

    pub fn reconstruct(&self) -> Result<StageReport> {
        self.run_stage(Stage::Reconstruct)
    }

    pub fn colorize(&self) -> Result<StageReport> {
        self.run_stage(Stage::Colorize)
    }

    pub fn export(&self) -> Result<StageReport> {
        self.run_stage(Stage::Export)
    }

    /// Launches one stage's tool and waits for it.
    ///
    /// A non-zero exit or a missing/empty declared output is reported through
    /// the returned outcome; `Err` is reserved for preflight and launch failures,
    /// which `execute` turns into outcomes.
    pub fn run_stage(&self, stage: Stage) -> Result<StageReport> {
        self.preflight(stage)?;

        let invocation = self.invocation(stage);
        let timer = StageTimer::start(stage);
        let exit = self.runner.run(&invocation)?;

        let outcome = if !exit.success {
            StageOutcome::ToolFailure { code: exit.code }
        } else if self.settings.verify_outputs {
            match Validator::first_missing_output(&invocation.outputs) {
                Some(path) => StageOutcome::MissingOutput { path: path.clone() },
                None => StageOutcome::Success,
            }
        } else {
            StageOutcome::Success
        };

        let elapsed = timer.finish(outcome.is_success());

        Ok(StageReport {
            stage,
            outcome,
            elapsed,
        })
    }

    /// Runs the selected stages in order and stops at the first unsuccessful one.
    /// Stage failures, including preflight and launch errors, are recorded in the
    /// report rather than returned as errors.
    pub fn execute(&self, selection: &StageSelection) -> Result<PipelineReport> {
        info!("Running stages {}", selection);
        let start = Instant::now();

        let tracker = ProgressTracker::new(selection.len(), self.settings.progress, self.colored);
        let mut report = PipelineReport::new(*selection);

        for stage in selection.stages() {
            tracker.start_stage(stage);

            let stage_start = Instant::now();
            let stage_report = match tracker.suspend(|| self.run_stage(stage)) {
                Ok(stage_report) => stage_report,
                Err(err) => {
                    error!("{}", err);
                    StageReport {
                        stage,
                        outcome: StageOutcome::from_error(&err),
                        elapsed: stage_start.elapsed(),
                    }
                }
            };

            let succeeded = stage_report.outcome.is_success();
            if !succeeded {
                error!(
                    "Stage {} failed ({}); remaining stages skipped",
                    stage,
                    stage_report.outcome.status()
                );
            }

            report.push(stage_report);

            if !succeeded {
                break;
            }
            tracker.complete_stage();
        }

        report.duration = start.elapsed();
        tracker.finish(report.succeeded());

        Ok(report)
    }

    /// Runs the selected stages and fails with the first failed stage's error.
    pub fn run(&self, selection: &StageSelection) -> Result<PipelineReport> {
        let report = self.execute(selection)?;
        report.ensure_success()?;
        Ok(report)
    }

    pub fn run_all(&self) -> Result<PipelineReport> {
        self.run(&StageSelection::all())
    }

    fn preflight(&self, stage: Stage) -> Result<()> {
        match stage {
            Stage::ListImages => {
                Validator::validate_directory(self.layout.input_dir())?;
                let images = Validator::count_images(self.layout.input_dir());
                if images == 0 {
                    warn!(
                        "No images found in {}",
                        self.layout.input_dir().display()
                    );
                } else {
                    info!("Found {} images to list", images);
                }
            }
            Stage::Export => {
                // The MVS directory is owned by the caller and never created here.
                if !self.layout.mvs_dir().is_dir() {
                    return Err(PipelineError::Validation(format!(
                        "stage {} requires an existing directory at {}",
                        stage,
                        self.layout.mvs_dir().display()
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

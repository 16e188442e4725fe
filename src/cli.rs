// file: src/cli.rs
// description: command line definition and stage range resolution
// reference: https://docs.rs/clap

use crate::error::{PipelineError, Result};
use crate::pipeline::{Stage, StageSelection};
use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sfm_orchestrator")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(
    about = "Runs the OpenMVG global structure-from-motion tool chain over an image directory",
    long_about = None
)]
pub struct Cli {
    /// Directory containing the source images
    pub image_dir: PathBuf,

    /// Directory the reconstruction project is written to (created if absent)
    pub output_dir: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// First stage to run (number or name)
    #[arg(long, value_name = "STAGE")]
    pub from: Option<Stage>,

    /// Last stage to run (number or name)
    #[arg(long, value_name = "STAGE")]
    pub to: Option<Stage>,

    /// Run a single stage
    #[arg(long, value_name = "STAGE", conflicts_with_all = ["from", "to"])]
    pub only: Option<Stage>,

    /// Print the tool command lines without running them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    pub fn usage() -> String {
        Cli::command().render_usage().to_string()
    }

    pub fn selection(&self) -> Result<StageSelection> {
        if let Some(stage) = self.only {
            return Ok(StageSelection::only(stage));
        }

        let from = self.from.unwrap_or(Stage::ListImages);
        let to = self.to.unwrap_or(Stage::Export);
        StageSelection::new(from, to).map_err(|e| match e {
            PipelineError::Validation(msg) => PipelineError::Validation(format!(
                "invalid --from/--to combination: {}",
                msg
            )),
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_requires_two_positionals() {
        assert!(Cli::try_parse_from(["sfm_orchestrator"]).is_err());
        assert!(Cli::try_parse_from(["sfm_orchestrator", "/data/photos"]).is_err());

        let cli = Cli::try_parse_from(["sfm_orchestrator", "/data/photos", "/data/proj"]).unwrap();
        assert_eq!(cli.image_dir, PathBuf::from("/data/photos"));
        assert_eq!(cli.output_dir, PathBuf::from("/data/proj"));
        assert_eq!(cli.selection().unwrap(), StageSelection::all());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_rejects_extra_positionals() {
        assert!(Cli::try_parse_from(["sfm_orchestrator", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_stage_range_flags() {
        let cli = Cli::try_parse_from([
            "sfm_orchestrator",
            "in",
            "out",
            "--from",
            "4",
            "--to",
            "reconstruct",
        ])
        .unwrap();
        assert_eq!(
            cli.selection().unwrap(),
            StageSelection::new(Stage::ComputeMatches, Stage::Reconstruct).unwrap()
        );

        let cli = Cli::try_parse_from(["sfm_orchestrator", "in", "out", "--only", "export"])
            .unwrap();
        assert_eq!(cli.selection().unwrap(), StageSelection::only(Stage::Export));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let cli =
            Cli::try_parse_from(["sfm_orchestrator", "in", "out", "--from", "7", "--to", "2"])
                .unwrap();
        assert!(cli.selection().is_err());
    }

    #[test]
    fn test_only_conflicts_with_range() {
        assert!(
            Cli::try_parse_from(["sfm_orchestrator", "in", "out", "--only", "1", "--to", "3"])
                .is_err()
        );
    }

    #[test]
    fn test_unknown_stage_is_parse_error() {
        assert!(Cli::try_parse_from(["sfm_orchestrator", "in", "out", "--from", "mesh"]).is_err());
    }

    #[test]
    fn test_usage_mentions_positionals() {
        let usage = Cli::usage();
        assert!(usage.contains("IMAGE_DIR"));
        assert!(usage.contains("OUTPUT_DIR"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}

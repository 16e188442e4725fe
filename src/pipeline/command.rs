// file: src/pipeline/command.rs
// description: argument vectors and declared outputs for each external tool
// reference: OpenMVG command line flags

use crate::config::ToolchainConfig;
use crate::layout::ProjectLayout;
use crate::pipeline::Stage;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

pub const DESCRIBER_METHOD: &str = "SIFT";
pub const GEOMETRIC_MODEL: &str = "e";
pub const SFM_ENGINE: &str = "GLOBAL";

/// A fully resolved external tool call for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInvocation {
    pub stage: Stage,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Files the tool must leave behind (non-empty) for the run to continue.
    pub outputs: Vec<PathBuf>,
}

impl StageInvocation {
    pub fn build(stage: Stage, layout: &ProjectLayout, toolchain: &ToolchainConfig) -> Self {
        let mut args = ArgList::default();

        let outputs = match stage {
            Stage::ListImages => {
                args.flag("-i", layout.input_dir())
                    .flag("-o", layout.matches_dir())
                    .flag("-d", layout.camera_db_file());
                vec![layout.sfm_data_json()]
            }
            Stage::ComputeFeatures => {
                args.flag("-i", layout.sfm_data_json())
                    .flag("-o", layout.matches_dir())
                    .flag("-m", DESCRIBER_METHOD);
                if let Some(threads) = toolchain.feature_threads {
                    args.flag("-n", threads.to_string());
                }
                vec![layout.image_describer()]
            }
            Stage::ComputePairs => {
                args.flag("-i", layout.sfm_data_json())
                    .flag("-o", layout.pairs_file());
                vec![layout.pairs_file()]
            }
            Stage::ComputeMatches => {
                args.flag("-i", layout.sfm_data_json())
                    .flag("-p", layout.pairs_file())
                    .flag("-o", layout.putative_matches());
                vec![layout.putative_matches()]
            }
            Stage::FilterMatches => {
                args.flag("-i", layout.sfm_data_json())
                    .flag("-m", layout.putative_matches())
                    .flag("-g", GEOMETRIC_MODEL)
                    .flag("-o", layout.essential_matches());
                vec![layout.essential_matches()]
            }
            Stage::Reconstruct => {
                args.flag("--sfm_engine", SFM_ENGINE)
                    .flag("--input_file", layout.sfm_data_json())
                    .flag("--match_file", layout.essential_matches())
                    .flag("--output_dir", layout.reconstruction_dir());
                vec![layout.sfm_data_bin()]
            }
            Stage::Colorize => {
                args.flag("-i", layout.sfm_data_bin())
                    .flag("-o", layout.colorized_ply());
                vec![layout.colorized_ply()]
            }
            Stage::Export => {
                args.flag("-i", layout.sfm_data_bin())
                    .flag("-o", layout.scene_mvs())
                    .flag("-d", layout.mvs_dir());
                vec![layout.scene_mvs()]
            }
        };

        Self {
            stage,
            program: toolchain.executable(stage),
            args: args.0,
            outputs,
        }
    }

    /// Value following `flag` in the argument vector.
    pub fn arg_value(&self, flag: &str) -> Option<&OsStr> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }

    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

impl fmt::Display for StageInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[derive(Default)]
struct ArgList(Vec<OsString>);

impl ArgList {
    fn flag(&mut self, name: &str, value: impl AsRef<OsStr>) -> &mut Self {
        self.0.push(OsString::from(name));
        self.0.push(value.as_ref().to_os_string());
        self
    }
}

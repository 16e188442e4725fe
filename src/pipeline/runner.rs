// file: src/pipeline/runner.rs
// description: launches external tools and reports how they exited
// reference: https://doc.rust-lang.org/std/process/struct.Command.html

use crate::error::{PipelineError, Result};
use crate::pipeline::command::StageInvocation;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    pub success: bool,
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: Option<i32>) -> Self {
        Self {
            success: false,
            code,
        }
    }
}

impl From<ExitStatus> for ToolExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Runs one stage's tool to completion.
pub trait ToolRunner {
    fn run(&self, invocation: &StageInvocation) -> Result<ToolExit>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn run(&self, invocation: &StageInvocation) -> Result<ToolExit> {
        (**self).run(invocation)
    }
}

/// Spawns the tool as a child process sharing this process's stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &StageInvocation) -> Result<ToolExit> {
        debug!("Launching: {}", invocation.command_line());

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| PipelineError::Spawn {
                stage: invocation.stage,
                program: invocation.program.clone(),
                source,
            })?;

        debug!("{} exited with {}", invocation.stage, status);
        Ok(ToolExit::from(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use std::ffi::OsString;
    use std::path::PathBuf;

    fn shell(stage: Stage, script: &str) -> StageInvocation {
        StageInvocation {
            stage,
            program: PathBuf::from("/bin/sh"),
            args: vec![OsString::from("-c"), OsString::from(script)],
            outputs: vec![],
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_success() {
        let exit = ProcessRunner.run(&shell(Stage::ListImages, "exit 0")).unwrap();
        assert_eq!(exit, ToolExit::ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_reports_exit_code() {
        let exit = ProcessRunner
            .run(&shell(Stage::FilterMatches, "exit 3"))
            .unwrap();
        assert_eq!(exit, ToolExit::failed(Some(3)));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let invocation = StageInvocation {
            stage: Stage::Colorize,
            program: PathBuf::from("/nonexistent/openMVG_main_ComputeSfM_DataColor"),
            args: vec![],
            outputs: vec![],
        };

        match ProcessRunner.run(&invocation) {
            Err(PipelineError::Spawn { stage, program, .. }) => {
                assert_eq!(stage, Stage::Colorize);
                assert_eq!(program, invocation.program);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

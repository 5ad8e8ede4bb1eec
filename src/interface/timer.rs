use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use log::{debug, error};

use super::process::{describe, status_text};
use super::Executor;
use crate::error::{Result, TuneError};

/// Times binaries by wall clock, with their output discarded.
///
/// Binaries run inside the work directory, which is where instrumented
/// builds leave their profile output.
pub struct WallClockTimer {
    work_dir: PathBuf,
}

impl WallClockTimer {
    pub fn new(work_dir: &Path) -> Self {
        return Self { work_dir: work_dir.to_path_buf() };
    }
}

impl Executor for WallClockTimer {
    fn run_and_time(&mut self, executable: &Path, args: &[String]) -> Result<f64> {
        let mut cmd = Command::new(executable);
        cmd.args(args)
            .current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let command = describe(&cmd);

        let start = Instant::now();
        let status = cmd
            .status()
            .map_err(|source| TuneError::Spawn { command: command.clone(), source })?;
        let elapsed = start.elapsed().as_secs_f64();

        if !status.success() {
            error!("`{}` exited with {}", command, status_text(&status));
            return Err(TuneError::ExecutionFailure {
                command,
                status: status_text(&status),
            });
        }

        debug!("`{}` took {:.3}s", command, elapsed);
        return Ok(elapsed);
    }
}

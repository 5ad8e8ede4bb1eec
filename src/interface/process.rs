use std::process::{Command, ExitStatus, Stdio};

use log::{debug, error};

use crate::error::{Result, TuneError};

/// Render CMD the way it would be typed in a shell, for diagnostics.
pub fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    return parts.join(" ");
}

pub fn status_text(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => status.to_string(),
    }
}

/// Run a build step to completion. A non-zero exit is a `BuildFailure`
/// carrying the captured stderr.
pub fn run_build(cmd: &mut Command) -> Result<()> {
    let command = describe(cmd);
    debug!("Running: {}", command);

    let out = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|source| TuneError::Spawn { command: command.clone(), source })?;

    if out.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
    error!("Failed to run `{}`:\n{}", command, stderr);
    return Err(TuneError::BuildFailure {
        command,
        status: status_text(&out.status),
        stderr,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_program_and_args() {
        let mut cmd = Command::new("./opt");
        cmd.args(["-inline", "a.bc"]).args(["-o", "b.bc"]);
        assert_eq!(describe(&cmd), "./opt -inline a.bc -o b.bc");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_build_failure() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo broken >&2; exit 3"]);
        match run_build(&mut cmd) {
            Err(TuneError::BuildFailure { status, stderr, .. }) => {
                assert_eq!(status, "exit code 3");
                assert!(stderr.contains("broken"));
            }
            other => panic!("expected build failure, got {:?}", other),
        }
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let mut cmd = Command::new("/nonexistent/inline-tuner/clang");
        assert!(matches!(run_build(&mut cmd), Err(TuneError::Spawn { .. })));
    }
}

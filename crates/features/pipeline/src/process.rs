use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// stdout followed by stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len() + 1);
        out.push_str(&self.stdout);
        if !self.stdout.is_empty() && !self.stdout.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }

    /// Last non-empty stderr line, or stdout's when stderr is silent.
    #[must_use]
    pub fn last_line(&self) -> &str {
        fn last(s: &str) -> Option<&str> {
            s.lines().rev().map(str::trim).find(|l| !l.is_empty())
        }
        last(&self.stderr).or_else(|| last(&self.stdout)).unwrap_or("")
    }
}

#[derive(Debug)]
pub enum RunError {
    Launch(io::Error),
    TimedOut,
}

/// Runs `program args…` in `cwd` with no shell, killing it if `timeout` elapses.
pub async fn run_bounded(
    program: &str,
    args: &[String],
    cwd: &Path,
    timeout: Duration,
) -> Result<ProcessOutput, RunError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(RunError::Launch)?;

    // Dropping the pending future on timeout drops the child, which kills it.
    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| RunError::TimedOut)?
        .map_err(RunError::Launch)?;

    Ok(ProcessOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_keeps_stream_order() {
        let output = ProcessOutput { code: Some(0), stdout: "a".into(), stderr: "b\n".into() };
        assert_eq!(output.combined(), "a\nb\n");
        assert_eq!(output.last_line(), "b");
        assert!(output.success());
    }

    #[test]
    fn last_line_falls_back_to_stdout() {
        let output =
            ProcessOutput { code: Some(1), stdout: "first\n  last  \n\n".into(), stderr: " \n".into() };
        assert_eq!(output.last_line(), "last");
        assert!(!output.success());

        let silent = ProcessOutput { code: None, stdout: String::new(), stderr: String::new() };
        assert_eq!(silent.last_line(), "");
    }

    #[tokio::test]
    async fn missing_programs_fail_to_launch() {
        let dir = std::env::temp_dir();
        let result = run_bounded("tforge-no-such-program", &[], &dir, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(RunError::Launch(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_programs_time_out() {
        let dir = std::env::temp_dir();
        let args = vec!["5".to_owned()];
        let result = run_bounded("sleep", &args, &dir, Duration::from_millis(100)).await;
        assert!(matches!(result, Err(RunError::TimedOut)));
    }
}

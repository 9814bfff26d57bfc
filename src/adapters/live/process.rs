//! Live process runner using `std::process::Command`.

use std::process::Command;

use crate::error::PortError;
use crate::ports::process::{ProcessOutput, ProcessRunner};

/// Live process runner that spawns programs directly, without a shell.
pub struct LiveProcessRunner;

impl ProcessRunner for LiveProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, PortError> {
        let output = Command::new(program).args(args).output()?;
        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_inherited(&self, program: &str, args: &[String]) -> Result<i32, PortError> {
        let status = Command::new(program).args(args).status()?;
        Ok(status.code().unwrap_or(-1))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn runs_echo_command() {
        let result = LiveProcessRunner.run("echo", &["hello".to_string()]).unwrap();

        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn captures_exit_code() {
        let args = vec!["-c".to_string(), "exit 42".to_string()];
        let result = LiveProcessRunner.run("sh", &args).unwrap();

        assert_eq!(result.exit_code, 42);
        assert!(!result.success());
    }

    #[test]
    fn missing_program_is_an_error() {
        assert!(LiveProcessRunner.run("/nonexistent/tubuild-compiler", &[]).is_err());
        assert!(LiveProcessRunner.run_inherited("/nonexistent/tubuild-test", &[]).is_err());
    }

    #[test]
    fn inherited_run_reports_exit_code() {
        let args = vec!["-c".to_string(), "exit 7".to_string()];
        assert_eq!(LiveProcessRunner.run_inherited("sh", &args).unwrap(), 7);
    }
}

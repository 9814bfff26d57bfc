//! Recording adapter for the `ProcessRunner` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::PortError;
use crate::ports::{ProcessOutput, ProcessRunner};

/// Records process invocations while delegating to an inner implementation.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessRunner {
    /// Creates a recording process runner wrapping `inner`.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RunInput<'a> {
    program: &'a str,
    args: &'a [String],
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, PortError> {
        let result = self.inner.run(program, args);
        record_result(&self.recorder, "process", "run", &RunInput { program, args }, &result);
        result
    }

    fn run_inherited(&self, program: &str, args: &[String]) -> Result<i32, PortError> {
        // Streamed output goes straight to the terminal; only the status is kept.
        let result = self.inner.run_inherited(program, args);
        let input = RunInput { program, args };
        record_result(&self.recorder, "process", "run_inherited", &input, &result);
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::adapters::live::LiveProcessRunner;

    #[test]
    fn records_program_and_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("process.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        {
            let runner =
                RecordingProcessRunner::new(Box::new(LiveProcessRunner), Arc::clone(&recorder));
            let output = runner.run("echo", &["hello".to_string()]).unwrap();
            assert!(output.success());
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        assert!(content.contains("process"));
        assert!(content.contains("echo"));
        assert!(content.contains("exit_code: 0"));
    }

    #[test]
    fn records_inherited_run_status() {
        let dir = tempfile::tempdir().unwrap();
        let cassette_path = dir.path().join("process.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        {
            let runner =
                RecordingProcessRunner::new(Box::new(LiveProcessRunner), Arc::clone(&recorder));
            let args = vec!["-c".to_string(), "exit 3".to_string()];
            assert_eq!(runner.run_inherited("sh", &args).unwrap(), 3);
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let content = std::fs::read_to_string(&cassette_path).unwrap();
        assert!(content.contains("run_inherited"));
        assert!(content.contains("ok: 3"));
    }
}

use crate::error::RunnerError;
use crate::execution_config::ExecutionConfig;
use db::models::test_block::{Model as BlockModel, TestResult};
use log::{info, warn};
use marker::{Verdict, VerdictClassifier};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::{
    process::Command,
    time::{Duration, timeout},
};
use util::paths::{block_report_path, ensure_dir};
use util::valgrind_report::{ValgrindReport, error_summary_line};

/// Appended to every script so the shell is asked to terminate.
pub const EXIT_COMMAND: &str = "exit";

/// What one run of one block produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub block_id: i64,
    pub verdict: Verdict,
    /// Where the report was meant to be written. Set even when the run failed
    /// before the tool could create it.
    pub report_path: PathBuf,
    /// Script exactly as sent to the child, terminating `exit` included.
    pub script: String,
    pub stdout: String,
    pub stderr: String,
    /// Parsed report, `None` when the run failed before a report was read.
    pub report: Option<ValgrindReport>,
}

impl RunOutcome {
    pub fn test_result(&self) -> TestResult {
        match self.verdict {
            Verdict::Pass => TestResult::Pass,
            Verdict::Fail => TestResult::Fail,
        }
    }

    pub fn report_path_string(&self) -> String {
        self.report_path.to_string_lossy().into_owned()
    }
}

struct Execution {
    stdout: String,
    stderr: String,
    report: String,
}

/// Executes test blocks under the instrumentation tool, one child at a time.
pub struct TestRunner {
    config: ExecutionConfig,
    classifier: Box<dyn VerdictClassifier>,
}

impl TestRunner {
    /// Runner using the classifier named by `config.policy`.
    pub fn new(config: ExecutionConfig) -> Self {
        let classifier = config.policy.classifier();
        Self { config, classifier }
    }

    pub fn with_classifier(config: ExecutionConfig, classifier: Box<dyn VerdictClassifier>) -> Self {
        Self { config, classifier }
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub async fn run_block(&self, block: &BlockModel) -> RunOutcome {
        self.run_script(block.id, &block.commands).await
    }

    /// Runs `commands` for block `block_id` and classifies the resulting report.
    ///
    /// Never fails: any launch, pipe, timeout or report-read problem is logged
    /// and yields a FAIL outcome with empty captured output.
    pub async fn run_script(&self, block_id: i64, commands: &str) -> RunOutcome {
        let script = format!("{commands}\n{EXIT_COMMAND}\n");
        let report_path = block_report_path(&self.config.report_dir, block_id);

        info!(
            "Launching {} for TestBlock ID {} (report: {})",
            self.config.tool.display(),
            block_id,
            report_path.display()
        );

        match self.execute(&script, &report_path).await {
            Ok(exec) => {
                let verdict = self.classifier.classify(&exec.report);
                log_diagnostics(block_id, &exec.report);
                let report = ValgrindReport::parse(&exec.report, &self.config.filters);
                RunOutcome {
                    block_id,
                    verdict,
                    report_path,
                    script,
                    stdout: exec.stdout,
                    stderr: exec.stderr,
                    report: Some(report),
                }
            }
            Err(e) => {
                warn!("Error running TestBlock ID {}: {}", block_id, e);
                RunOutcome {
                    block_id,
                    verdict: Verdict::Fail,
                    report_path,
                    script,
                    stdout: String::new(),
                    stderr: String::new(),
                    report: None,
                }
            }
        }
    }

    async fn execute(&self, script: &str, report_path: &Path) -> Result<Execution, RunnerError> {
        ensure_dir(&self.config.report_dir).map_err(|source| RunnerError::ReportDir {
            path: self.config.report_dir.clone(),
            source,
        })?;

        // A report left over from an earlier run must not be mistaken for this one.
        match tokio::fs::remove_file(report_path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!("Could not remove stale report {}: {}", report_path.display(), e)
            }
            _ => {}
        }

        let mut child = Command::new(&self.config.tool)
            .args(self.config.tool_argv(report_path))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RunnerError::Spawn)?;

        let mut stdin = child.stdin.take().ok_or(RunnerError::MissingStdin)?;

        let feed = async move {
            let written = stdin.write_all(script.as_bytes()).await;
            drop(stdin);
            match written {
                // The child may legitimately exit before reading everything.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other.map_err(RunnerError::Stdin),
            }
        };
        let wait = async { child.wait_with_output().await.map_err(RunnerError::Wait) };

        let secs = self.config.timeout_secs;
        let (_, output) = timeout(Duration::from_secs(secs), async { tokio::try_join!(feed, wait) })
            .await
            .map_err(|_| RunnerError::Timeout { secs })??;

        let raw = tokio::fs::read(report_path)
            .await
            .map_err(|source| RunnerError::ReportRead {
                path: report_path.to_path_buf(),
                source,
            })?;

        Ok(Execution {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            report: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}

fn log_diagnostics(block_id: i64, report: &str) {
    if let Some(line) = error_summary_line(report) {
        info!("Valgrind Error Summary for TestBlock ID {}: {}", block_id, line.trim());
    }
    if report.contains(marker::classifiers::INVALID_FREE) {
        warn!("Invalid free detected in TestBlock ID {}", block_id);
    }
    if report.contains(marker::classifiers::SIGSEGV) {
        warn!("SIGSEGV detected in TestBlock ID {}", block_id);
    }
}

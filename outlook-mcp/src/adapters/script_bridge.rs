//! Script-backed mail store
//!
//! Every session call spawns one `outlook_*.py` script, waits up to the
//! configured limit and returns its stdout verbatim. A child that outlives
//! the limit is killed when its handle is dropped.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use outlook_mcp_core::error::{CoreError, CoreResult};
use outlook_mcp_core::traits::{MailSession, MailStore};
use outlook_mcp_core::types::{FilterRequest, ListRequest, ReadRequest, SearchRequest};
use outlook_mcp_core::DaslSyntax;
use tokio::process::Command;

use super::command::{filter_args, list_args, read_args, search_args, Operation};
use crate::config::TimeoutConfig;

/// Exit code of an argparse usage error.
const EXIT_USAGE: i32 = 2;

/// Script exit codes with a defined meaning.
const EXIT_NOT_FOUND: i32 = 10;
const EXIT_INVALID_INPUT: i32 = 11;
const EXIT_UNAVAILABLE: i32 = 12;
const EXIT_PERMISSION_DENIED: i32 = 13;

/// How to locate and run the automation scripts.
#[derive(Debug, Clone)]
pub struct ScriptBridge {
    interpreter: String,
    scripts_dir: PathBuf,
    timeouts: TimeoutConfig,
    /// Syntax of the `--dasl` filter handed to search; `None` omits it
    dasl: Option<DaslSyntax>,
}

impl ScriptBridge {
    #[must_use]
    pub fn new(interpreter: impl Into<String>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            scripts_dir: scripts_dir.into(),
            timeouts: TimeoutConfig::default(),
            dasl: None,
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Pass the compiled filter to the search script as `--dasl`.
    #[must_use]
    pub fn with_dasl(mut self, syntax: DaslSyntax) -> Self {
        self.dasl = Some(syntax);
        self
    }

    fn script_path(&self, op: Operation) -> PathBuf {
        self.scripts_dir.join(op.script())
    }

    fn limit(&self, op: Operation) -> Duration {
        match op {
            Operation::List => self.timeouts.list(),
            Operation::Filter => self.timeouts.filter(),
            Operation::Search => self.timeouts.search(),
            Operation::Read => self.timeouts.read(),
        }
    }

    /// Runs the script for `op` and returns its stdout.
    pub async fn run(&self, op: Operation, args: Vec<String>, limit: Duration) -> CoreResult<String> {
        let script = self.script_path(op);
        if !script.is_file() {
            return Err(CoreError::Unavailable(format!(
                "script not found: {}",
                script.display()
            )));
        }

        tracing::debug!(script = %script.display(), ?args, "running script");

        let child = Command::new(&self.interpreter)
            .arg(&script)
            .args(&args)
            .env("PYTHONIOENCODING", "utf-8")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(&self.interpreter, &e))?;

        let output = match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| CoreError::Upstream {
                operation: op.phrase().to_string(),
                message: e.to_string(),
            })?,
            Err(_) => {
                tracing::warn!(script = op.script(), "script timed out, killing it");
                return Err(CoreError::Timeout {
                    operation: op.phrase().to_string(),
                    timeout_secs: limit.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(classify_failure(op, output.status, &stderr, &stdout))
    }
}

fn spawn_error(interpreter: &str, err: &std::io::Error) -> CoreError {
    if err.kind() == std::io::ErrorKind::NotFound {
        CoreError::Unavailable(format!("interpreter '{interpreter}' not found"))
    } else {
        CoreError::Unavailable(format!("failed to start '{interpreter}': {err}"))
    }
}

/// Maps a non-zero exit onto the error taxonomy, keeping the script's own words.
fn classify_failure(op: Operation, status: ExitStatus, stderr: &str, stdout: &str) -> CoreError {
    let diagnostic = [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .map_or_else(|| format!("script exited with {status}"), str::to_string);

    match status.code() {
        Some(EXIT_NOT_FOUND) => CoreError::NotFound(diagnostic),
        Some(EXIT_USAGE | EXIT_INVALID_INPUT) => CoreError::InvalidInput(diagnostic),
        Some(EXIT_UNAVAILABLE) => CoreError::Unavailable(diagnostic),
        Some(EXIT_PERMISSION_DENIED) => CoreError::PermissionDenied(diagnostic),
        _ => CoreError::Upstream {
            operation: op.phrase().to_string(),
            message: diagnostic,
        },
    }
}

/// Mail store that shells out to the Outlook automation scripts.
pub struct ScriptMailStore {
    bridge: Arc<ScriptBridge>,
}

impl ScriptMailStore {
    #[must_use]
    pub fn new(bridge: ScriptBridge) -> Self {
        Self {
            bridge: Arc::new(bridge),
        }
    }

    #[must_use]
    pub fn scripts_dir(&self) -> &Path {
        &self.bridge.scripts_dir
    }
}

#[async_trait]
impl MailStore for ScriptMailStore {
    async fn open_session(&self) -> CoreResult<Box<dyn MailSession>> {
        Ok(Box::new(ScriptSession {
            bridge: Arc::clone(&self.bridge),
        }))
    }
}

struct ScriptSession {
    bridge: Arc<ScriptBridge>,
}

impl ScriptSession {
    async fn call(&self, op: Operation, args: Vec<String>) -> CoreResult<String> {
        self.bridge.run(op, args, self.bridge.limit(op)).await
    }
}

#[async_trait]
impl MailSession for ScriptSession {
    async fn list_path(&self, request: &ListRequest) -> CoreResult<String> {
        self.call(Operation::List, list_args(request)).await
    }

    async fn filter_path(&self, request: &FilterRequest) -> CoreResult<String> {
        self.call(Operation::Filter, filter_args(request)).await
    }

    async fn search_path(&self, request: &SearchRequest) -> CoreResult<String> {
        let args = search_args(request, self.bridge.dasl);
        self.call(Operation::Search, args).await
    }

    async fn read_item(&self, request: &ReadRequest) -> CoreResult<String> {
        self.call(Operation::Read, read_args(request)).await
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use outlook_mcp_core::types::OutputMode;
    use outlook_mcp_core::utils::datetime::DateRange;
    use tempfile::TempDir;

    /// Scripts directory whose `op` script is the given shell snippet, run by `sh`.
    fn bridge_with(op: Operation, body: &str) -> (TempDir, ScriptBridge) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(op.script()), body).unwrap();
        let bridge = ScriptBridge::new("sh", dir.path());
        (dir, bridge)
    }

    const LIMIT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn stdout_is_returned_verbatim() {
        let (_dir, bridge) = bridge_with(Operation::List, "printf '%s|' \"$@\"\n");
        let out = bridge
            .run(Operation::List, vec!["acct/Inbox".into(), "--all".into()], LIMIT)
            .await
            .unwrap();
        assert_eq!(out, "acct/Inbox|--all|");
    }

    #[tokio::test]
    async fn session_passes_rendered_arguments() {
        let (_dir, bridge) = bridge_with(Operation::Read, "printf '%s ' \"$@\"\n");
        let store = ScriptMailStore::new(bridge);
        let session = store.open_session().await.unwrap();
        let request = ReadRequest::new("AAEC").unwrap().with_json(true);
        let out = session.read_item(&request).await.unwrap();
        assert_eq!(out, "AAEC --json ");
    }

    #[tokio::test]
    async fn child_gets_utf8_encoding() {
        let (_dir, bridge) = bridge_with(Operation::List, "printf '%s' \"$PYTHONIOENCODING\"\n");
        let out = bridge.run(Operation::List, Vec::new(), LIMIT).await.unwrap();
        assert_eq!(out, "utf-8");
    }

    #[tokio::test]
    async fn exit_codes_are_classified() {
        let cases = [
            (10, "not_found"),
            (11, "invalid_input"),
            (12, "unavailable"),
            (13, "permission_denied"),
            (2, "invalid_input"),
            (1, "upstream"),
        ];
        for (code, kind) in cases {
            let (_dir, bridge) =
                bridge_with(Operation::Read, &format!("echo 'boom {code}' >&2\nexit {code}\n"));
            let err = bridge.run(Operation::Read, Vec::new(), LIMIT).await.unwrap_err();
            let actual = serde_json::to_value(err.kind()).unwrap();
            assert_eq!(actual, kind, "exit {code}");
            assert!(err.to_string().contains(&format!("boom {code}")));
        }
    }

    #[tokio::test]
    async fn argparse_usage_error_is_invalid_input() {
        let (_dir, bridge) = bridge_with(
            Operation::Search,
            "echo 'usage: outlook_search.py [-h] pattern path' >&2\n\
             echo 'outlook_search.py: error: unrecognized arguments: --bogus' >&2\n\
             exit 2\n",
        );
        let store = ScriptMailStore::new(bridge);
        let session = store.open_session().await.unwrap();
        let request = SearchRequest::new(
            "United&ZRH",
            "acct/Inbox",
            OutputMode::List,
            DateRange::default(),
            None,
        )
        .unwrap();
        let err = session.search_path(&request).await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)), "{err:?}");
        assert!(err.to_string().contains("unrecognized arguments"));
    }

    #[tokio::test]
    async fn search_sends_no_dasl_unless_enabled() {
        let body = "printf '%s|' \"$@\"\n";
        let request = SearchRequest::new(
            "United&ZRH",
            "acct/Inbox",
            OutputMode::List,
            DateRange::default(),
            None,
        )
        .unwrap();

        let (_dir, bridge) = bridge_with(Operation::Search, body);
        let session = ScriptMailStore::new(bridge).open_session().await.unwrap();
        let out = session.search_path(&request).await.unwrap();
        assert_eq!(out, "United&ZRH|acct/Inbox|");

        let (_dir, bridge) = bridge_with(Operation::Search, body);
        let session = ScriptMailStore::new(bridge.with_dasl(DaslSyntax::Like))
            .open_session()
            .await
            .unwrap();
        let out = session.search_path(&request).await.unwrap();
        assert!(out.starts_with("United&ZRH|acct/Inbox|--dasl|"), "{out}");
    }

    #[tokio::test]
    async fn upstream_failure_is_operation_scoped() {
        let (_dir, bridge) = bridge_with(Operation::Read, "echo 'MAPI_E_CALL_FAILED' >&2\nexit 1\n");
        let err = bridge.run(Operation::Read, Vec::new(), LIMIT).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to read item: MAPI_E_CALL_FAILED");
    }

    #[tokio::test]
    async fn diagnostic_falls_back_to_stdout_then_status() {
        let (_dir, bridge) = bridge_with(Operation::Filter, "echo 'from stdout'\nexit 1\n");
        let err = bridge.run(Operation::Filter, Vec::new(), LIMIT).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to filter items: from stdout");

        let (_dir, bridge) = bridge_with(Operation::Filter, "exit 7\n");
        let err = bridge.run(Operation::Filter, Vec::new(), LIMIT).await.unwrap_err();
        assert!(err.to_string().contains("script exited with"));
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let (_scripts, bridge) = bridge_with(Operation::Search, "sleep 3\ntouch \"$1\"\n");

        let err = bridge
            .run(
                Operation::Search,
                vec![marker.display().to_string()],
                Duration::from_secs(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Timeout {
                ref operation,
                timeout_secs: 1
            } if operation == "search items"
        ));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!marker.exists(), "killed script must not finish");
    }

    #[tokio::test]
    async fn missing_script_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = ScriptBridge::new("sh", dir.path());
        let err = bridge.run(Operation::List, Vec::new(), LIMIT).await.unwrap_err();
        assert!(matches!(err, CoreError::Unavailable(_)));
        assert!(err.to_string().contains("outlook_list.py"));
    }

    #[tokio::test]
    async fn missing_interpreter_is_unavailable() {
        let (dir, _) = bridge_with(Operation::List, "exit 0\n");
        let bridge = ScriptBridge::new("definitely-not-an-interpreter", dir.path());
        let err = bridge.run(Operation::List, Vec::new(), LIMIT).await.unwrap_err();
        assert!(matches!(err, CoreError::Unavailable(_)));
    }
}

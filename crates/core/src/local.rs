//! Local execution of environment scripts
//!
//! `LocalExec` satisfies both capability contracts by running scripts on the
//! local machine through the shell. It keeps the submit/fetch split honest:
//! submission spawns a worker thread and hands back a job token; the fetch
//! joins the job under an explicit deadline. That makes the two-step
//! protocol observable without any remote infrastructure, and puts timeout
//! policy where the lifecycle contract assigns it: at the capability
//! boundary.
//!
//! Scripts receive scalar parameters as environment variables. Commands run
//! sequentially through `sh -c` (or `cmd /C` on Windows); the first
//! non-zero exit stops the script. When the script succeeds and its last
//! stdout line is a JSON object, that object becomes the result mapping
//! (benchmark score fields); otherwise the captured output is returned under
//! `stdout`/`stderr` keys.

use crate::params::Params;
use crate::services::{ExecOutcome, HostOps, RemoteExec};
use crate::status::Status;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default deadline for one script or host operation
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for local script execution
#[derive(Debug, Clone)]
pub struct LocalExecConfig {
    /// Deadline for resolving one submitted script. A fetch past this
    /// deadline reports `TimedOut`; the worker is left to finish detached.
    pub timeout: Duration,
}

impl Default for LocalExecConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Outcome of one locally executed script
#[derive(Debug)]
struct ScriptResult {
    success: bool,
    exit_code: i32,
    stdout: String,
    stderr: String,
}

/// Local implementation of the remote-execution and host capabilities.
#[derive(Debug)]
pub struct LocalExec {
    config: LocalExecConfig,
    jobs: Mutex<HashMap<u64, Receiver<ScriptResult>>>,
    next_job_id: AtomicU64,
}

impl Default for LocalExec {
    fn default() -> Self {
        Self::new(LocalExecConfig::default())
    }
}

impl LocalExec {
    /// Create an executor with the given configuration
    pub fn new(config: LocalExecConfig) -> Self {
        Self {
            config,
            jobs: Mutex::new(HashMap::new()),
            next_job_id: AtomicU64::new(1),
        }
    }

    /// Create an executor with a specific script deadline
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(LocalExecConfig { timeout })
    }
}

/// Scalar parameters become environment variables for the script; composite
/// values are skipped (shells have no use for raw JSON structure).
fn script_env(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name.clone(), s.clone())),
            Value::Number(n) => Some((name.clone(), n.to_string())),
            Value::Bool(b) => Some((name.clone(), b.to_string())),
            _ => None,
        })
        .collect()
}

/// Run the commands sequentially, stopping at the first non-zero exit.
fn run_script(script: &[String], env: &[(String, String)]) -> ScriptResult {
    let mut stdout_parts: Vec<String> = Vec::new();
    let mut stderr_parts: Vec<String> = Vec::new();

    for command_line in script {
        debug!(command = %command_line, "Executing local command");

        let mut command = if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command_line]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command_line]);
            cmd
        };
        for (name, value) in env {
            command.env(name, value);
        }

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                stderr_parts.push(format!("failed to spawn '{}': {}", command_line, e));
                return ScriptResult {
                    success: false,
                    exit_code: -1,
                    stdout: stdout_parts.join("\n"),
                    stderr: stderr_parts.join("\n"),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            stdout_parts.push(stdout.trim_end().to_string());
        }
        if !stderr.trim().is_empty() {
            stderr_parts.push(stderr.trim_end().to_string());
        }

        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code != 0 {
            warn!(command = %command_line, exit_code, "Local command failed");
            return ScriptResult {
                success: false,
                exit_code,
                stdout: stdout_parts.join("\n"),
                stderr: stderr_parts.join("\n"),
            };
        }
    }

    ScriptResult {
        success: true,
        exit_code: 0,
        stdout: stdout_parts.join("\n"),
        stderr: stderr_parts.join("\n"),
    }
}

/// Extract the result mapping from a successful script's output.
fn result_payload(result: &ScriptResult) -> Value {
    if let Some(last_line) = result.stdout.lines().rev().find(|l| !l.trim().is_empty()) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(last_line.trim()) {
            return Value::Object(map);
        }
    }
    json!({"stdout": result.stdout, "stderr": result.stderr})
}

impl RemoteExec for LocalExec {
    fn submit(&self, script: &[String], params: &Params) -> ExecOutcome {
        let job_id = self.next_job_id.fetch_add(1, Ordering::SeqCst);
        let script = script.to_vec();
        let env = script_env(params);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = run_script(&script, &env);
            // Receiver may already have given up (deadline); that's fine.
            let _ = tx.send(result);
        });

        match self.jobs.lock() {
            Ok(mut jobs) => {
                jobs.insert(job_id, rx);
            }
            Err(_) => {
                return (
                    Status::Failed,
                    Some(json!({"error": "job registry poisoned"})),
                );
            }
        }

        debug!(job_id, "Local script submitted");
        (Status::Pending, Some(json!({"job_id": job_id})))
    }

    fn fetch_result(&self, token: &Value) -> ExecOutcome {
        let job_id = match token.get("job_id").and_then(Value::as_u64) {
            Some(id) => id,
            None => {
                return (
                    Status::Failed,
                    Some(json!({"error": "unknown job token", "token": token.clone()})),
                );
            }
        };

        let rx = match self.jobs.lock().ok().and_then(|mut jobs| jobs.remove(&job_id)) {
            Some(rx) => rx,
            None => {
                return (
                    Status::Failed,
                    Some(json!({"error": format!("no such job: {}", job_id)})),
                );
            }
        };

        match rx.recv_timeout(self.config.timeout) {
            Ok(result) if result.success => {
                debug!(job_id, "Local script succeeded");
                (Status::Succeeded, Some(result_payload(&result)))
            }
            Ok(result) => (
                Status::Failed,
                Some(json!({
                    "exit_code": result.exit_code,
                    "stdout": result.stdout,
                    "stderr": result.stderr,
                })),
            ),
            Err(RecvTimeoutError::Timeout) => {
                warn!(job_id, timeout = ?self.config.timeout, "Local script timed out");
                (Status::TimedOut, None)
            }
            Err(RecvTimeoutError::Disconnected) => (
                Status::Failed,
                Some(json!({"error": "script worker terminated unexpectedly"})),
            ),
        }
    }
}

impl HostOps for LocalExec {
    fn start_host(&self, _params: &Params) -> ExecOutcome {
        // The local host is already up.
        (Status::Succeeded, None)
    }

    fn await_host_operation(&self, _handle: &Value) -> ExecOutcome {
        (Status::Succeeded, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentSection;
    use crate::environment::RemoteEnvironment;
    use crate::exec::ScriptRunner;
    use crate::params::TunableValues;

    fn run(exec: &LocalExec, script: &[&str]) -> ExecOutcome {
        run_with_params(exec, script, &Params::new())
    }

    fn run_with_params(exec: &LocalExec, script: &[&str], params: &Params) -> ExecOutcome {
        let script: Vec<String> = script.iter().map(|s| s.to_string()).collect();
        ScriptRunner::new(exec).execute(&script, params)
    }

    #[test]
    fn test_submit_returns_pending_with_job_token() {
        let exec = LocalExec::default();
        let (status, token) = exec.submit(&["true".to_string()], &Params::new());
        assert_eq!(status, Status::Pending);
        let token = token.unwrap();
        assert!(token.get("job_id").and_then(Value::as_u64).is_some());
    }

    #[test]
    fn test_last_json_line_becomes_result_mapping() {
        let exec = LocalExec::default();
        let (status, payload) = run(&exec, &["echo warming up", r#"echo '{"score": 42}'"#]);
        assert_eq!(status, Status::Succeeded);
        assert_eq!(payload.unwrap().get("score"), Some(&json!(42)));
    }

    #[test]
    fn test_plain_output_is_returned_under_stdout() {
        let exec = LocalExec::default();
        let (status, payload) = run(&exec, &["echo hello"]);
        assert_eq!(status, Status::Succeeded);
        assert_eq!(payload.unwrap().get("stdout"), Some(&json!("hello")));
    }

    #[test]
    fn test_first_failing_command_stops_the_script() {
        let exec = LocalExec::default();
        let (status, payload) = run(&exec, &["echo one", "exit 3", "echo two"]);
        assert_eq!(status, Status::Failed);
        let payload = payload.unwrap();
        assert_eq!(payload.get("exit_code"), Some(&json!(3)));
        let stdout = payload.get("stdout").unwrap().as_str().unwrap();
        assert!(stdout.contains("one"));
        assert!(!stdout.contains("two"));
    }

    #[test]
    fn test_scalar_params_are_exported_as_env_vars() {
        let exec = LocalExec::default();
        let mut params = Params::new();
        params.insert("BENCH_PORT".to_string(), json!(6379));
        params.insert("BENCH_MODE".to_string(), json!("fast"));
        params.insert("ignored".to_string(), json!([1, 2]));

        let (status, payload) = run_with_params(
            &exec,
            &[r#"echo "{\"port\": $BENCH_PORT, \"mode\": \"$BENCH_MODE\"}""#],
            &params,
        );
        assert_eq!(status, Status::Succeeded);
        let payload = payload.unwrap();
        assert_eq!(payload.get("port"), Some(&json!(6379)));
        assert_eq!(payload.get("mode"), Some(&json!("fast")));
    }

    #[test]
    fn test_deadline_reports_timed_out() {
        let exec = LocalExec::with_timeout(Duration::from_millis(50));
        let (status, payload) = run(&exec, &["sleep 5"]);
        assert_eq!(status, Status::TimedOut);
        assert_eq!(payload, None);
    }

    #[test]
    fn test_unknown_token_is_failed() {
        let exec = LocalExec::default();
        let (status, _) = exec.fetch_result(&json!({"job_id": 999}));
        assert_eq!(status, Status::Failed);

        let (status, _) = exec.fetch_result(&Value::Null);
        assert_eq!(status, Status::Failed);
    }

    #[test]
    fn test_host_ops_report_immediate_success() {
        let exec = LocalExec::default();
        let (status, _) = exec.start_host(&Params::new());
        assert!(status.is_succeeded());
        let (status, _) = exec.await_host_operation(&Value::Null);
        assert!(status.is_succeeded());
    }

    #[test]
    fn test_full_lifecycle_against_local_exec() {
        let exec = LocalExec::default();
        let section = EnvironmentSection {
            run: Some(vec![r#"echo '{"score": 7.5}'"#.to_string()]),
            teardown: Some(vec!["true".to_string()]),
            const_args: Some(Params::new()),
            tunable_params: Some(Vec::new()),
            ..Default::default()
        };
        let mut environment =
            RemoteEnvironment::new("local-bench", &section, &exec, &exec).unwrap();

        assert!(environment.setup(&TunableValues::new(), None));
        let (status, payload) = environment.run();
        assert_eq!(status, Status::Succeeded);
        assert_eq!(payload.unwrap().get("score"), Some(&json!(7.5)));
        environment.teardown();
    }
}

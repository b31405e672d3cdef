//! Remote script runner
//!
//! Resolves one script to a terminal `(status, payload)` pair through the
//! two-step submit/fetch protocol: submission acceptance and result
//! production are separate capability operations, so a long-running remote
//! job never has to resolve inside the submit call. A `Succeeded` submission
//! still gets a fetch; acceptance is not completion. A rejected submission
//! (`Failed`, `TimedOut`) is returned unchanged with no fetch.

use crate::params::Params;
use crate::services::{ExecOutcome, RemoteExec};
use crate::status::Status;
use serde_json::Value;
use tracing::debug;

/// Submits scripts and resolves them to terminal outcomes.
pub struct ScriptRunner<'a, R: RemoteExec> {
    remote: &'a R,
}

impl<'a, R: RemoteExec> ScriptRunner<'a, R> {
    /// Create a runner over the given remote execution capability.
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Execute a script and return its final `(status, payload)` pair.
    ///
    /// No retries and no timeout enforcement here; the fetch call may block
    /// while the capability waits for the remote side.
    pub fn execute(&self, script: &[String], params: &Params) -> ExecOutcome {
        debug!(commands = script.len(), "Submitting script");
        let (status, output) = self.remote.submit(script, params);
        debug!(status = %status, "Script submitted");

        if !matches!(status, Status::Pending | Status::Succeeded) {
            // Rejected submission: nothing to fetch.
            return (status, output);
        }

        let token = output.unwrap_or(Value::Null);
        let (status, output) = self.remote.fetch_result(&token);
        debug!(status = %status, "Script result fetched");
        (status, output)
    }
}

//! Capability contracts consumed by the lifecycle controller
//!
//! Two independent traits stand between the controller and whatever actually
//! reaches the remote host (SSH, a cloud control plane, an agent protocol):
//! remote script execution and host power/lifecycle operations. Each is
//! satisfiable on its own; an implementation that covers both (like
//! [`crate::local::LocalExec`]) simply implements both traits.
//!
//! Remote failures are data, not errors: every operation resolves to an
//! [`ExecOutcome`] and the caller folds the status into its phase result.
//! Timeout and polling cadence live behind these traits: `fetch_result` and
//! `await_host_operation` may block the calling thread while the remote
//! operation completes, and implementations that poll must guarantee they
//! eventually return a terminal status.

use crate::params::Params;
use crate::status::Status;
use serde_json::Value;

/// A `(status, payload)` pair resolving one capability operation.
///
/// The payload is opaque to the controller: a submission token, an operation
/// handle, or a result mapping (e.g. benchmark score fields), depending on
/// which operation produced it. The controller passes it through unchanged.
pub type ExecOutcome = (Status, Option<Value>);

/// Remote script execution capability.
pub trait RemoteExec {
    /// Submit a script (ordered command strings) for execution with the
    /// given parameters. A non-terminal or `Succeeded` status means the
    /// submission was accepted (not that the script finished) and the
    /// payload is the token to pass to [`RemoteExec::fetch_result`].
    fn submit(&self, script: &[String], params: &Params) -> ExecOutcome;

    /// Resolve a previously accepted submission to its terminal status and
    /// result mapping. May block while the remote side completes.
    fn fetch_result(&self, token: &Value) -> ExecOutcome;
}

/// Host power/lifecycle capability.
pub trait HostOps {
    /// Trigger host start with the current parameter set. A `Pending`
    /// status carries the operation handle to await.
    fn start_host(&self, params: &Params) -> ExecOutcome;

    /// Block until a pending host operation reaches a terminal status.
    fn await_host_operation(&self, handle: &Value) -> ExecOutcome;
}

// Implement the capability traits for references so controllers can borrow
// a shared service instance.

impl<T: RemoteExec> RemoteExec for &T {
    fn submit(&self, script: &[String], params: &Params) -> ExecOutcome {
        (*self).submit(script, params)
    }

    fn fetch_result(&self, token: &Value) -> ExecOutcome {
        (*self).fetch_result(token)
    }
}

impl<T: HostOps> HostOps for &T {
    fn start_host(&self, params: &Params) -> ExecOutcome {
        (*self).start_host(params)
    }

    fn await_host_operation(&self, handle: &Value) -> ExecOutcome {
        (*self).await_host_operation(handle)
    }
}

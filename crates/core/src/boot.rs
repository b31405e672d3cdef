//! Host readiness gating
//!
//! Before any script runs against a host that may still be powering on, the
//! setup phase can wait for it: trigger the start operation and, when the
//! capability reports a pending operation, await its terminal status. A
//! host that does not come up is a normal negative result for setup, not an
//! error.

use crate::params::Params;
use crate::services::HostOps;
use serde_json::Value;
use tracing::{debug, info};

/// Drives the host start/await sequence for one setup phase.
pub struct HostReadiness<'a, H: HostOps> {
    host: &'a H,
}

impl<'a, H: HostOps> HostReadiness<'a, H> {
    /// Create a readiness controller over the given host capability.
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Start the host and wait for a terminal status.
    ///
    /// Returns true only when the final status is `Succeeded`. The await
    /// call is expected to block or poll internally; no additional timing
    /// logic happens here, deadline policy belongs to the capability.
    pub fn ensure_ready(&self, params: &Params) -> bool {
        let (status, handle) = self.host.start_host(params);
        debug!(status = %status, "Host start submitted");

        let status = if status.is_pending() {
            let handle = handle.unwrap_or(Value::Null);
            let (status, _) = self.host.await_host_operation(&handle);
            status
        } else {
            status
        };

        info!(status = %status, "Host start complete");
        status.is_succeeded()
    }
}

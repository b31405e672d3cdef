//! Remote environment lifecycle controller
//!
//! Composes the base lifecycle contract, the phase-script registry, and the
//! two capability contracts into the three-phase protocol: `setup` waits for
//! the host (when asked), runs the setup script, and latches the readiness
//! flag; `run` executes the run script only while ready and surfaces its
//! result payload; `teardown` runs its script unconditionally once invoked.
//!
//! Phase failures are ordinary negative results (a boolean or a status
//! pair), never errors — retry/abort policy belongs to whoever drives the
//! environment. Everything here is synchronous and single-threaded; the only
//! blocking points are the capability await/fetch calls.

use crate::boot::HostReadiness;
use crate::config::{EnvironmentConfig, EnvironmentSection};
use crate::errors::{ConfigError, Result};
use crate::exec::ScriptRunner;
use crate::params::{overlay, Params, TunableValues};
use crate::redaction;
use crate::scripts::PhaseScripts;
use crate::services::{ExecOutcome, HostOps, RemoteExec};
use crate::status::Status;
use tracing::{debug, info, warn};

/// The base lifecycle contract every environment delegates to.
///
/// Owns the environment name, the working parameter set, and the readiness
/// flag. Requires the `const_args` and `tunable_params` sections of the
/// config at construction; merges tunable values and the global-config
/// overlay at setup; reports the ready/not-ready baseline that gates `run`.
#[derive(Debug, Clone)]
pub struct BaseEnvironment {
    name: String,
    const_args: Params,
    tunable_params: Vec<String>,
    params: Params,
    is_ready: bool,
}

impl BaseEnvironment {
    /// Build the base contract from an environment's config section.
    pub fn new(name: impl Into<String>, section: &EnvironmentSection) -> Result<Self> {
        let name = name.into();
        let const_args = section.const_args.clone().ok_or_else(|| {
            ConfigError::Validation {
                message: format!("environment '{}' must have a const_args section", name),
            }
        })?;
        let tunable_params = section.tunable_params.clone().ok_or_else(|| {
            ConfigError::Validation {
                message: format!("environment '{}' must have a tunable_params section", name),
            }
        })?;
        let params = const_args.clone();
        Ok(Self {
            name,
            const_args,
            tunable_params,
            params,
            is_ready: false,
        })
    }

    /// Human-readable environment name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current working parameter set
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether setup has completed successfully
    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    fn set_ready(&mut self, ready: bool) {
        self.is_ready = ready;
    }

    /// Rebuild the working parameter set for a new setup pass.
    ///
    /// Precedence, lowest to highest: `const_args`, the tunables named by
    /// `tunable_params`, the global-config overlay. Returns false when a
    /// named tunable is missing from the supplied collection. Overlay values
    /// are registered with the secret redaction registry before the merged
    /// set is logged.
    pub fn setup(&mut self, tunables: &TunableValues, global_config: Option<&Params>) -> bool {
        self.params = self.const_args.clone();

        for name in &self.tunable_params {
            match tunables.get(name) {
                Some(value) => {
                    self.params.insert(name.clone(), value.clone());
                }
                None => {
                    warn!(
                        environment = %self.name,
                        tunable = %name,
                        "Tunable required by the environment is missing"
                    );
                    return false;
                }
            }
        }

        if let Some(global) = global_config {
            for value in global.values() {
                redaction::global_registry().register_json_values(value);
            }
            overlay(&mut self.params, global);
        }

        if let Ok(serialized) = serde_json::to_string(&self.params) {
            debug!(
                environment = %self.name,
                params = %redaction::redact(&serialized),
                "Parameter set assembled"
            );
        }
        true
    }

    /// Baseline run outcome: `(Ready, None)` once setup completed,
    /// `(Pending, None)` otherwise.
    pub fn run(&self) -> ExecOutcome {
        let status = if self.is_ready {
            Status::Ready
        } else {
            Status::Pending
        };
        (status, None)
    }

    /// Drop readiness; the environment must be set up again before running.
    pub fn teardown(&mut self) {
        self.is_ready = false;
    }
}

/// Lifecycle controller for a benchmark environment on a remote host.
///
/// Generic over the two capability contracts so transports (SSH, cloud
/// control plane, local execution) stay out of the core. The capabilities
/// are borrowed or owned per the caller's choice; `&T` implementations let
/// one service instance back several environments.
#[derive(Debug)]
pub struct RemoteEnvironment<R: RemoteExec, H: HostOps> {
    base: BaseEnvironment,
    scripts: PhaseScripts,
    remote: R,
    host: H,
}

impl<R: RemoteExec, H: HostOps> RemoteEnvironment<R, H> {
    /// Create a controller from a name and config section.
    ///
    /// Fails with a configuration error when the section configures none of
    /// {setup, run, teardown, wait_boot} or lacks the sections the base
    /// contract requires. No side effects on failure.
    pub fn new(
        name: impl Into<String>,
        section: &EnvironmentSection,
        remote: R,
        host: H,
    ) -> Result<Self> {
        let base = BaseEnvironment::new(name, section)?;
        let scripts = PhaseScripts::from_section(section)?;
        Ok(Self {
            base,
            scripts,
            remote,
            host,
        })
    }

    /// Create a controller from a loaded environment definition.
    pub fn from_config(config: &EnvironmentConfig, remote: R, host: H) -> Result<Self> {
        Self::new(&config.name, &config.config, remote, host)
    }

    /// Human-readable environment name
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Whether setup has completed successfully
    pub fn is_ready(&self) -> bool {
        self.base.is_ready()
    }

    /// The current working parameter set
    pub fn params(&self) -> &Params {
        self.base.params()
    }

    /// Set up the environment: apply tunables, wait for the host when
    /// `wait_boot` is set, then run the setup script if configured.
    ///
    /// Returns true when the environment is ready to run. A host that fails
    /// to boot or a failing setup script yields false, not an error.
    pub fn setup(&mut self, tunables: &TunableValues, global_config: Option<&Params>) -> bool {
        if !self.base.setup(tunables, global_config) {
            return false;
        }

        if self.scripts.wait_boot {
            info!(environment = %self.base.name(), "Waiting for the remote host to start");
            let readiness = HostReadiness::new(&self.host);
            if !readiness.ensure_ready(self.base.params()) {
                self.base.set_ready(false);
                return false;
            }
        }

        if let Some(script) = self.scripts.setup.as_deref() {
            info!(environment = %self.base.name(), "Setting up the remote environment");
            let (status, _) = ScriptRunner::new(&self.remote).execute(script, self.base.params());
            info!(environment = %self.base.name(), status = %status, "Remote setup complete");
            self.base.set_ready(status.is_succeeded());
        } else {
            self.base.set_ready(true);
        }

        self.base.is_ready()
    }

    /// Run the environment's run script and return its `(status, payload)`
    /// outcome.
    ///
    /// Consults the base contract's baseline first: when the environment is
    /// not ready, or no run script is configured, the baseline is returned
    /// unchanged and no remote execution is attempted.
    pub fn run(&self) -> ExecOutcome {
        let baseline = self.base.run();
        let script = match self.scripts.run.as_deref() {
            Some(script) if baseline.0.is_ready() => script,
            _ => return baseline,
        };

        info!(environment = %self.base.name(), "Running script on the remote environment");
        let (status, output) = ScriptRunner::new(&self.remote).execute(script, self.base.params());
        info!(environment = %self.base.name(), status = %status, "Remote run complete");
        (status, output)
    }

    /// Tear down the environment.
    ///
    /// Runs the teardown script if configured, regardless of prior phase
    /// outcomes; the script's status is logged but does not change any
    /// externally visible state. Then delegates to the base contract.
    pub fn teardown(&mut self) {
        if let Some(script) = self.scripts.teardown.as_deref() {
            info!(environment = %self.base.name(), "Tearing down the remote environment");
            let (status, _) = ScriptRunner::new(&self.remote).execute(script, self.base.params());
            info!(environment = %self.base.name(), status = %status, "Remote teardown complete");
        }
        self.base.teardown();
    }
}

//! Phase script registry
//!
//! Holds the optional setup/run/teardown command sequences and the boot-wait
//! flag of one environment, with the construction-time rule that an
//! environment configuring none of them is rejected: it would do nothing.

use crate::config::EnvironmentSection;
use crate::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// The three optional phase scripts plus the boot-wait flag.
///
/// Absence of a script means "skip this phase's remote execution"; the phase
/// itself still runs through the base lifecycle contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseScripts {
    /// Commands run once during setup
    pub setup: Option<Vec<String>>,
    /// Commands run on each `run()` call
    pub run: Option<Vec<String>>,
    /// Commands run once during teardown
    pub teardown: Option<Vec<String>>,
    /// Whether setup must first wait for the remote host to boot
    #[serde(default)]
    pub wait_boot: bool,
}

impl PhaseScripts {
    /// Create a registry, rejecting the do-nothing combination.
    pub fn new(
        setup: Option<Vec<String>>,
        run: Option<Vec<String>>,
        teardown: Option<Vec<String>>,
        wait_boot: bool,
    ) -> Result<Self> {
        if setup.is_none() && run.is_none() && teardown.is_none() && !wait_boot {
            return Err(ConfigError::Validation {
                message: "at least one of {setup, run, teardown} must be present \
                          or wait_boot set to true"
                    .to_string(),
            }
            .into());
        }
        Ok(Self {
            setup,
            run,
            teardown,
            wait_boot,
        })
    }

    /// Read the registry out of an environment config section.
    pub fn from_section(section: &EnvironmentSection) -> Result<Self> {
        Self::new(
            section.setup.clone(),
            section.run.clone(),
            section.teardown.clone(),
            section.wait_boot,
        )
    }
}

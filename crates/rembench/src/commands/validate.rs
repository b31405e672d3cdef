//! Validate command implementation

use anyhow::Result;
use rembench_core::config::ConfigLoader;
use rembench_core::environment::BaseEnvironment;
use rembench_core::scripts::PhaseScripts;
use std::path::Path;
use tracing::debug;

/// Load an environment definition and run every construction-time check
/// without touching any capability.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = ConfigLoader::load_from_path(config_path)?;
    let _ = BaseEnvironment::new(&config.name, &config.config)?;
    let scripts = PhaseScripts::from_section(&config.config)?;
    debug!(environment = %config.name, ?scripts, "Environment validated");

    println!("Configuration OK: {}", config.name);
    Ok(())
}

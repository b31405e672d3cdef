//! Run command implementation
//!
//! Drives one full lifecycle pass against the local executor: setup, run,
//! teardown. The run outcome (status plus result payload) is printed to
//! stdout as JSON; teardown is always attempted, whatever the earlier
//! phases did.

use anyhow::{bail, Context, Result};
use rembench_core::config::ConfigLoader;
use rembench_core::environment::RemoteEnvironment;
use rembench_core::local::LocalExec;
use rembench_core::params::{Params, TunableValues};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Arguments for the run command
#[derive(Debug)]
pub struct RunArgs {
    /// Path to the environment config file
    pub config: PathBuf,
    /// Tunable assignments (`name=value`)
    pub tunables: Vec<String>,
    /// Optional global config overlay file
    pub globals: Option<PathBuf>,
    /// Deadline in seconds for each script or host operation
    pub timeout_secs: u64,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = ConfigLoader::load_from_path(&args.config)?;
    let tunables = TunableValues::from_assignments(&args.tunables)?;
    let globals = load_globals(args.globals.as_deref())?;

    let exec = LocalExec::with_timeout(Duration::from_secs(args.timeout_secs));
    let mut environment = RemoteEnvironment::from_config(&config, &exec, &exec)?;

    info!(environment = %environment.name(), "Starting lifecycle");
    if !environment.setup(&tunables, globals.as_ref()) {
        environment.teardown();
        bail!("environment '{}' failed to set up", config.name);
    }

    let (status, payload) = environment.run();
    let report = json!({
        "environment": environment.name(),
        "status": status,
        "result": payload,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    environment.teardown();

    if !status.is_ready() {
        bail!(
            "environment '{}' run finished with status {}",
            config.name,
            status
        );
    }
    Ok(())
}

fn load_globals(path: Option<&std::path::Path>) -> Result<Option<Params>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read globals file {}", path.display()))?;
    let globals: Params = serde_json::from_str(&content)
        .with_context(|| format!("globals file {} must hold a JSON object", path.display()))?;
    Ok(Some(globals))
}

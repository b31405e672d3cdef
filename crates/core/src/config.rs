//! Environment configuration loading and parsing
//!
//! Environment definitions are JSON-with-comments files (parsed with the
//! json5 crate to tolerate comments and trailing commas) holding a name and
//! a free-form config section. Known keys are strongly typed; unknown keys
//! are preserved and logged at DEBUG for forward compatibility. Validation
//! beyond shape — the do-nothing rule, required sections — happens where the
//! respective component is constructed.

use crate::errors::{ConfigError, Result};
use crate::params::Params;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// One environment definition: a human-readable name plus its config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Human-readable name of the environment
    pub name: String,
    /// The environment's configuration section
    pub config: EnvironmentSection,
}

/// The recognized keys of an environment's config section.
///
/// `const_args` and `tunable_params` are required by the base lifecycle
/// contract; they are optional here so that the contract (not the parser)
/// reports their absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSection {
    /// Wait for the remote host to boot before running setup (default false)
    #[serde(default)]
    pub wait_boot: bool,
    /// Commands run once during setup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Vec<String>>,
    /// Commands run on each `run()` call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<Vec<String>>,
    /// Commands run once during teardown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown: Option<Vec<String>>,
    /// Constant parameters mixed into the working parameter set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub const_args: Option<Params>,
    /// Names of the tunables this environment consumes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunable_params: Option<Vec<String>>,
    /// Unknown keys, kept for forward compatibility
    #[serde(flatten)]
    pub extra: Params,
}

/// Loader for environment definition files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an environment definition from a JSONC file.
    #[instrument(level = "debug")]
    pub fn load_from_path(path: &Path) -> Result<EnvironmentConfig> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: EnvironmentConfig =
            json5::from_str(&content).map_err(|e| ConfigError::Parsing {
                message: e.to_string(),
            })?;

        if !config.config.extra.is_empty() {
            let keys: Vec<&str> = config.config.extra.keys().map(String::as_str).collect();
            debug!(environment = %config.name, unknown_keys = ?keys, "Ignoring unknown config keys");
        }
        debug!(environment = %config.name, "Environment config loaded");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RembenchError;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_jsonc_with_comments() {
        let file = write_config(
            r#"{
                // redis benchmark on a remote VM
                "name": "redis-remote",
                "config": {
                    "wait_boot": true,
                    "setup": ["sudo apt-get install -y redis-server"],
                    "run": ["./run_benchmark.sh"],
                    "const_args": {"port": 6379},
                    "tunable_params": ["maxmemory"],
                },
            }"#,
        );

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.name, "redis-remote");
        assert!(config.config.wait_boot);
        assert_eq!(
            config.config.setup,
            Some(vec!["sudo apt-get install -y redis-server".to_string()])
        );
        assert_eq!(config.config.teardown, None);
        assert_eq!(
            config.config.const_args.as_ref().unwrap().get("port"),
            Some(&json!(6379))
        );
        assert_eq!(
            config.config.tunable_params,
            Some(vec!["maxmemory".to_string()])
        );
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let file = write_config(
            r#"{
                "name": "env",
                "config": { "run": ["true"], "experimental_knob": 3 }
            }"#,
        );

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.config.extra.get("experimental_knob"), Some(&json!(3)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/env.jsonc")).unwrap_err();
        assert!(matches!(
            err,
            RembenchError::Config(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_parsing_error() {
        let file = write_config("{ not valid");
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RembenchError::Config(ConfigError::Parsing { .. })
        ));
    }
}

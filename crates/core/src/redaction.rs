//! Secret redaction for logged parameters
//!
//! Global-config overlays carry deployment credentials that end up in the
//! working parameter set, and the lifecycle controller logs that set. This
//! module keeps an in-memory registry of secret values and scrubs them from
//! any text about to be logged. Detection is naive substring replacement
//! with a minimum-length threshold to avoid redacting short common strings.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Minimum length for a value to be considered for redaction
const MIN_REDACTION_LENGTH: usize = 8;

/// Replacement text for redacted secrets
const REDACTION_PLACEHOLDER: &str = "****";

/// Thread-safe registry of secret values to scrub from log output.
#[derive(Debug, Clone, Default)]
pub struct SecretRegistry {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl SecretRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a secret value. Values shorter than the minimum length are
    /// ignored — redacting them would mangle ordinary output.
    pub fn register(&self, value: &str) {
        if value.len() < MIN_REDACTION_LENGTH {
            return;
        }
        if let Ok(mut secrets) = self.inner.write() {
            secrets.insert(value.to_string());
        }
    }

    /// Register every string leaf of a JSON value (overlay maps may nest).
    pub fn register_json_values(&self, value: &Value) {
        match value {
            Value::String(s) => self.register(s),
            Value::Array(items) => {
                for item in items {
                    self.register_json_values(item);
                }
            }
            Value::Object(map) => {
                for item in map.values() {
                    self.register_json_values(item);
                }
            }
            _ => {}
        }
    }

    /// Replace all registered secrets in `text` with the placeholder.
    pub fn redact(&self, text: &str) -> String {
        let secrets = match self.inner.read() {
            Ok(secrets) => secrets,
            Err(_) => return text.to_string(),
        };
        let mut redacted = text.to_string();
        for secret in secrets.iter() {
            if redacted.contains(secret.as_str()) {
                redacted = redacted.replace(secret.as_str(), REDACTION_PLACEHOLDER);
            }
        }
        redacted
    }

    /// Number of registered secrets
    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.len()).unwrap_or(0)
    }

    /// True when no secrets are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all registered secrets (test isolation)
    pub fn clear(&self) {
        if let Ok(mut secrets) = self.inner.write() {
            secrets.clear();
        }
    }
}

static GLOBAL_REGISTRY: Lazy<SecretRegistry> = Lazy::new(SecretRegistry::new);

/// The process-wide registry used by the lifecycle controller.
pub fn global_registry() -> &'static SecretRegistry {
    &GLOBAL_REGISTRY
}

/// Redact using the global registry.
pub fn redact(text: &str) -> String {
    GLOBAL_REGISTRY.redact(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_redact() {
        let registry = SecretRegistry::new();
        registry.register("s3cr3t-storage-key");
        assert_eq!(registry.len(), 1);

        let line = "uploading with key s3cr3t-storage-key to share";
        assert_eq!(registry.redact(line), "uploading with key **** to share");
    }

    #[test]
    fn test_short_values_are_not_registered() {
        let registry = SecretRegistry::new();
        registry.register("abc");
        assert!(registry.is_empty());
        assert_eq!(registry.redact("abc is fine"), "abc is fine");
    }

    #[test]
    fn test_register_json_values_walks_nested_structure() {
        let registry = SecretRegistry::new();
        registry.register_json_values(&json!({
            "storageAccountKey": "deadbeefcafe1234",
            "nested": {"sasTokens": ["sig=0123456789abcdef"]},
            "retries": 3
        }));
        assert_eq!(registry.len(), 2);

        let text = "params: key=deadbeefcafe1234 sas=sig=0123456789abcdef retries=3";
        assert_eq!(registry.redact(text), "params: key=**** sas=**** retries=3");
    }

    #[test]
    fn test_redact_without_matches_returns_input() {
        let registry = SecretRegistry::new();
        registry.register("unrelated-secret");
        assert_eq!(registry.redact("nothing to hide"), "nothing to hide");
    }
}

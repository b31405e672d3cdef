//! Parameter maps and tunable assignments
//!
//! Environments work against a flat, order-preserving parameter map assembled
//! from three layers with increasing precedence: the environment's
//! `const_args`, the tunable values supplied at setup, and the global-config
//! overlay (credentials, deployment coordinates). This module provides the
//! map type, the merge helper, and the tunable-assignment collection the CLI
//! and the base lifecycle contract exchange.

use crate::errors::{Result, TunableError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flat parameter map handed to capability operations.
///
/// Backed by `serde_json::Map` with the `preserve_order` feature so scripts
/// see parameters in the order the configuration declared them.
pub type Params = serde_json::Map<String, Value>;

/// Merge `src` into `dst`, overwriting existing keys.
pub fn overlay(dst: &mut Params, src: &Params) {
    for (key, value) in src {
        dst.insert(key.clone(), value.clone());
    }
}

/// A collection of tunable-parameter assignments for one setup call.
///
/// The optimizer (or the CLI's `--tunable` flags) produces these; the base
/// lifecycle contract copies the subset named by the environment's
/// `tunable_params` section into the working parameter map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TunableValues {
    values: Params,
}

impl TunableValues {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assignments held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no assignments are held
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set or replace one assignment
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Look up an assignment by tunable name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Iterate over assignments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Add an assignment parsed from a `name=value` string.
    ///
    /// The value is taken as JSON when it parses as a scalar (`8`, `2.5`,
    /// `true`) and as a plain string otherwise, so shell callers don't have
    /// to quote-escape strings.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| TunableError::InvalidAssignment {
                assignment: assignment.to_string(),
            })?;
        if name.is_empty() {
            return Err(TunableError::InvalidAssignment {
                assignment: assignment.to_string(),
            }
            .into());
        }
        let value = match serde_json::from_str::<Value>(raw) {
            Ok(v) if !v.is_array() && !v.is_object() => v,
            _ => Value::String(raw.to_string()),
        };
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Build a collection from repeated `name=value` strings
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = Self::new();
        for assignment in assignments {
            values.set_assignment(assignment.as_ref())?;
        }
        Ok(values)
    }
}

impl From<Params> for TunableValues {
    fn from(values: Params) -> Self {
        Self { values }
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// What to do with a construction seed that is neither absent nor a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Reject it with an argument error.
    #[default]
    Strict,
    /// Log it and start from an empty context.
    Lenient,
}

/// Sandbox options, usually read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub seed_policy: SeedPolicy,
    /// Reject scripts that reference variables unknown at compile time.
    pub strict_variables: bool,
    pub allow_shadowing: bool,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::Strict,
            strict_variables: false,
            allow_shadowing: true,
        }
    }
}

impl SandboxConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

//! Engine configuration loading

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::revoke::RevokeMode;

/// Environment variable overriding the revoke mode
pub const ENV_REVOKE_MODE: &str = "PROCFLOW_AUTHZ_REVOKE_MODE";

/// Environment variable toggling authorization checks
pub const ENV_ENABLED: &str = "PROCFLOW_AUTHZ_ENABLED";

/// Complete engine configuration
///
/// ```toml
/// [authorization]
/// enabled = true
/// revoke_mode = "always"
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub authorization: AuthorizationSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorizationSection {
    /// When false every mutation is authorized without consulting records
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub revoke_mode: RevokeMode,
}

impl Default for AuthorizationSection {
    fn default() -> Self {
        Self {
            enabled: true,
            revoke_mode: RevokeMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_true")]
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            ansi: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// Configuration with the given revoke mode and defaults elsewhere
    pub fn with_revoke_mode(revoke_mode: RevokeMode) -> Self {
        Self {
            authorization: AuthorizationSection {
                revoke_mode,
                ..AuthorizationSection::default()
            },
            ..Self::default()
        }
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse engine configuration")
    }

    /// Loads configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Applies `PROCFLOW_AUTHZ_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_REVOKE_MODE) {
            self.authorization.revoke_mode = mode
                .parse::<RevokeMode>()
                .with_context(|| format!("Invalid {}", ENV_REVOKE_MODE))?;
        }

        if let Some(enabled) = lookup(ENV_ENABLED) {
            self.authorization.enabled = match enabled.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => anyhow::bail!("Invalid {}: '{}'", ENV_ENABLED, other),
            };
        }

        Ok(self)
    }

    pub fn revoke_mode(&self) -> RevokeMode {
        self.authorization.revoke_mode
    }

    pub fn authorization_enabled(&self) -> bool {
        self.authorization.enabled
    }
}

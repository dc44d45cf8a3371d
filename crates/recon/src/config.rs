use serde::Deserialize;

use crate::error::AuditError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AuditConfig {
    pub trail: TrailConfig,
    pub stores: StorePair,
}

#[derive(Debug, Deserialize)]
pub struct TrailConfig {
    /// Path to the CSV failure trail, relative to the config file.
    pub file: String,
}

#[derive(Debug, Deserialize)]
pub struct StorePair {
    pub source: StoreConfig,
    pub dest: StoreConfig,
}

// ---------------------------------------------------------------------------
// Store endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the document data service.
    pub url: String,
    /// Auth spec: "none", "bearer-env:VAR", or "header-env:NAME:VAR".
    /// Secrets are resolved from environment variables only.
    #[serde(default = "default_auth")]
    pub auth: String,
    /// Per-lookup timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_auth() -> String {
    "none".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl AuditConfig {
    pub fn from_toml(s: &str) -> Result<Self, AuditError> {
        let config: Self = toml::from_str(s).map_err(|e| AuditError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.trail.file.is_empty() {
            return Err(AuditError::ConfigValidation("trail.file is empty".into()));
        }
        for (name, store) in [("source", &self.stores.source), ("dest", &self.stores.dest)] {
            if store.url.is_empty() {
                return Err(AuditError::ConfigValidation(format!(
                    "stores.{name}.url is empty"
                )));
            }
            if store.timeout_secs == 0 {
                return Err(AuditError::ConfigValidation(format!(
                    "stores.{name}.timeout_secs must be positive"
                )));
            }
        }
        Ok(())
    }
}

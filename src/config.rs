//! Application configuration file support.
//!
//! An optional TOML file supplies collector settings so API keys don't have
//! to live on the command line:
//!
//! ```toml
//! [collector]
//! region = "us"
//! language = "english"
//! steam_api_key = "..."
//! gamalytic_api_key = "..."
//! calls = 60
//! period = 60
//! ```
//!
//! CLI flags always win over file values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::collector::CollectorOptions;
use crate::error::{GameInsightsError, Result};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "game-insights.toml";

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub collector: CollectorSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectorSection {
    pub region: Option<String>,
    pub language: Option<String>,
    pub steam_api_key: Option<String>,
    pub gamalytic_api_key: Option<String>,
    pub calls: Option<u32>,
    /// Rate-limit period in seconds.
    pub period: Option<u64>,
}

impl AppConfig {
    /// Load configuration. An explicitly given path must exist; the default
    /// path is optional and silently skipped when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Path::new(DEFAULT_CONFIG_FILE).to_path_buf(), false),
        };

        if !path.exists() {
            if required {
                return Err(GameInsightsError::ConfigNotFound { path });
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Fold file values into collector options (file fills, caller
    /// overrides are applied afterwards by the CLI).
    pub fn apply(&self, options: &mut CollectorOptions) {
        if let Some(region) = &self.collector.region {
            options.region = region.clone();
        }
        if let Some(language) = &self.collector.language {
            options.language = language.clone();
        }
        if let Some(key) = &self.collector.steam_api_key {
            options.steam_api_key = Some(key.clone());
        }
        if let Some(key) = &self.collector.gamalytic_api_key {
            options.gamalytic_api_key = Some(key.clone());
        }
        if let Some(calls) = self.collector.calls {
            options.calls = calls;
        }
        if let Some(period) = self.collector.period {
            options.period = Duration::from_secs(period);
        }
    }
}

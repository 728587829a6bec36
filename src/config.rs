//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.xpath-coverage.toml` in current directory
//! 4. `~/.config/xpath-rule-coverage/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [engine]
//! binary = "pmd"               # or an absolute path
//! timeout_secs = 60
//!
//! [coverage]
//! fail_on_uncovered = true
//! require_examples = true
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `XPATH_COVERAGE_ENGINE` | Engine binary to invoke |
//! | `XPATH_COVERAGE_ENGINE_TIMEOUT` | Engine timeout in seconds |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine:   EngineConfig,
    #[serde(default)]
    pub coverage: CoverageConfig
}

/// External engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Engine binary name or path; `pmd` from `PATH` when unset
    pub binary:       Option<String>,
    /// Seconds before an engine run is abandoned
    pub timeout_secs: u64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary:       None,
            timeout_secs: 60
        }
    }
}

/// Coverage verification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageConfig {
    /// Exit non-zero when any rule has uncovered features
    pub fail_on_uncovered: bool,
    /// Treat a rule without examples as a failure instead of skipping it
    pub require_examples:  bool
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            fail_on_uncovered: true,
            require_examples:  true
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.xpath-coverage.toml)
    /// 3. Config file in home directory
    ///    (~/.config/xpath-rule-coverage/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        // Try to load from home directory config
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("xpath-rule-coverage")
                .join("config.toml");

            if home_config.exists() {
                let content = fs::read_to_string(&home_config)
                    .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
                config = toml::from_str(&content)
                    .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
            }
        }

        // Try to load from current directory config (overrides home config)
        let local_config = PathBuf::from(".xpath-coverage.toml");
        if local_config.exists() {
            let content = fs::read_to_string(&local_config)
                .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
            config = toml::from_str(&content)
                .map_err(|e| config_error(format!("Invalid config file: {}", e)))?;
        }

        // Override with environment variables
        if let Ok(binary) = env::var("XPATH_COVERAGE_ENGINE") {
            config.engine.binary = Some(binary);
        }

        if let Ok(timeout) = env::var("XPATH_COVERAGE_ENGINE_TIMEOUT") {
            config.engine.timeout_secs = timeout
                .parse()
                .map_err(|_| config_error("XPATH_COVERAGE_ENGINE_TIMEOUT must be a number"))?;
        }

        Ok(config)
    }
}

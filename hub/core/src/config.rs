//! TOML Configuration File Support
//!
//! Configuration lives at `$XDG_CONFIG_HOME/greenhero/greenhero.toml`
//! (typically `~/.config/greenhero/greenhero.toml`).
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [ledger]
//! initial_balance = 1250
//!
//! [analysis]
//! delay_ms = 3000
//! timeout_ms = 10000
//! vegetarian_probability = 0.7
//! failure_rate = 0.0
//! max_image_bytes = 10485760
//! seed = 42
//!
//! [rewards]
//! redemption_enabled = true
//! ```
//!
//! # Environment Variables
//!
//! - `GREENHERO_INITIAL_BALANCE`
//! - `GREENHERO_ANALYSIS_DELAY_MS`
//! - `GREENHERO_ANALYSIS_TIMEOUT_MS`
//! - `GREENHERO_VEGETARIAN_PROBABILITY`
//! - `GREENHERO_FAILURE_RATE`
//! - `GREENHERO_MAX_IMAGE_BYTES`
//! - `GREENHERO_SEED`
//! - `GREENHERO_REDEMPTION_ENABLED`

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::MockClassifierConfig;
use crate::seed;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Ledger section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerToml {
    /// Starting Green Coin balance
    pub initial_balance: Option<u64>,
}

/// Analysis section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisToml {
    /// Simulated inference latency in milliseconds
    pub delay_ms: Option<u64>,
    /// Overall time budget per run in milliseconds
    pub timeout_ms: Option<u64>,
    /// Chance a mock result is vegetarian
    pub vegetarian_probability: Option<f64>,
    /// Chance a mock run fails
    pub failure_rate: Option<f64>,
    /// Largest accepted upload in bytes
    pub max_image_bytes: Option<u64>,
    /// Fixed RNG seed
    pub seed: Option<u64>,
}

/// Rewards section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardsToml {
    /// Whether rewards can be redeemed
    pub redemption_enabled: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenToml {
    /// Ledger section
    pub ledger: LedgerToml,
    /// Analysis section
    pub analysis: AnalysisToml,
    /// Rewards section
    pub rewards: RewardsToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Resolved ledger settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Starting balance
    pub initial_balance: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: seed::INITIAL_BALANCE,
        }
    }
}

/// Resolved analysis settings
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Simulated inference latency
    pub delay: Duration,
    /// Overall time budget per run
    pub timeout: Duration,
    /// Chance a mock result is vegetarian
    pub vegetarian_probability: f64,
    /// Chance a mock run fails
    pub failure_rate: f64,
    /// Largest accepted upload in bytes
    pub max_image_bytes: u64,
    /// Fixed RNG seed
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(3),
            timeout: Duration::from_secs(10),
            vegetarian_probability: 0.7,
            failure_rate: 0.0,
            max_image_bytes: 10 * 1024 * 1024,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Settings for the mock classifier
    #[must_use]
    pub fn mock_config(&self) -> MockClassifierConfig {
        MockClassifierConfig {
            delay: self.delay,
            vegetarian_probability: self.vegetarian_probability,
            failure_rate: self.failure_rate,
            seed: self.seed,
        }
    }
}

/// Resolved reward settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardsConfig {
    /// Whether rewards can be redeemed
    pub redemption_enabled: bool,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            redemption_enabled: true,
        }
    }
}

/// Centralized configuration for GreenHero
///
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug, Default)]
pub struct GreenConfig {
    /// Ledger settings
    pub ledger: LedgerConfig,
    /// Analysis settings
    pub analysis: AnalysisConfig,
    /// Reward settings
    pub rewards: RewardsConfig,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    pub source: ConfigSource,
}

impl GreenConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for probabilities outside
    /// [0, 1], a zero image cap, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analysis;
        if !(0.0..=1.0).contains(&a.vegetarian_probability) {
            return Err(ConfigError::ValidationError(format!(
                "vegetarian_probability must be within [0, 1], got {}",
                a.vegetarian_probability
            )));
        }
        if !(0.0..=1.0).contains(&a.failure_rate) {
            return Err(ConfigError::ValidationError(format!(
                "failure_rate must be within [0, 1], got {}",
                a.failure_rate
            )));
        }
        if a.max_image_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "max_image_bytes must be greater than zero".to_string(),
            ));
        }
        if a.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/greenhero/greenhero.toml` or
/// `~/.config/greenhero/greenhero.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("greenhero").join("greenhero.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resolved values fail validation. A missing config file is not an
/// error (defaults are used).
pub fn load_config() -> Result<GreenConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the resolved values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<GreenConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with a custom environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<GreenConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = GreenConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: GreenToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    if apply_env_config(&mut config, env)? {
        config.source = ConfigSource::Env;
    }

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut GreenConfig, toml: &GreenToml) {
    if let Some(balance) = toml.ledger.initial_balance {
        config.ledger.initial_balance = balance;
    }

    let a = &toml.analysis;
    if let Some(ms) = a.delay_ms {
        config.analysis.delay = Duration::from_millis(ms);
    }
    if let Some(ms) = a.timeout_ms {
        config.analysis.timeout = Duration::from_millis(ms);
    }
    if let Some(p) = a.vegetarian_probability {
        config.analysis.vegetarian_probability = p;
    }
    if let Some(p) = a.failure_rate {
        config.analysis.failure_rate = p;
    }
    if let Some(bytes) = a.max_image_bytes {
        config.analysis.max_image_bytes = bytes;
    }
    if a.seed.is_some() {
        config.analysis.seed = a.seed;
    }

    if let Some(enabled) = toml.rewards.redemption_enabled {
        config.rewards.redemption_enabled = enabled;
    }
}

/// Apply environment overrides; returns whether any were set
fn apply_env_config<F>(config: &mut GreenConfig, env: F) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = false;

    if let Some(v) = parse_env::<u64, _>(&env, "GREENHERO_INITIAL_BALANCE")? {
        config.ledger.initial_balance = v;
        applied = true;
    }
    if let Some(v) = parse_env::<u64, _>(&env, "GREENHERO_ANALYSIS_DELAY_MS")? {
        config.analysis.delay = Duration::from_millis(v);
        applied = true;
    }
    if let Some(v) = parse_env::<u64, _>(&env, "GREENHERO_ANALYSIS_TIMEOUT_MS")? {
        config.analysis.timeout = Duration::from_millis(v);
        applied = true;
    }
    if let Some(v) = parse_env::<f64, _>(&env, "GREENHERO_VEGETARIAN_PROBABILITY")? {
        config.analysis.vegetarian_probability = v;
        applied = true;
    }
    if let Some(v) = parse_env::<f64, _>(&env, "GREENHERO_FAILURE_RATE")? {
        config.analysis.failure_rate = v;
        applied = true;
    }
    if let Some(v) = parse_env::<u64, _>(&env, "GREENHERO_MAX_IMAGE_BYTES")? {
        config.analysis.max_image_bytes = v;
        applied = true;
    }
    if let Some(v) = parse_env::<u64, _>(&env, "GREENHERO_SEED")? {
        config.analysis.seed = Some(v);
        applied = true;
    }
    if let Some(v) = env("GREENHERO_REDEMPTION_ENABLED") {
        config.rewards.redemption_enabled = parse_bool(&v).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "GREENHERO_REDEMPTION_ENABLED must be a boolean, got {v:?}"
            ))
        })?;
        applied = true;
    }

    Ok(applied)
}

fn parse_env<T, F>(env: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::ValidationError(format!("{key} has an invalid value: {raw:?}"))
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = load_config_with_env(None, no_env).unwrap();
        assert_eq!(config.ledger.initial_balance, 1250);
        assert_eq!(config.analysis.delay, Duration::from_secs(3));
        assert!((config.analysis.vegetarian_probability - 0.7).abs() < f64::EPSILON);
        assert!(config.rewards.redemption_enabled);
        assert_eq!(config.source, ConfigSource::Default);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            load_config_with_env(Some(PathBuf::from("/nonexistent/greenhero.toml")), no_env)
                .unwrap();
        assert_eq!(config.source, ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_file_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[ledger]\ninitial_balance = 500\n\n[analysis]\ndelay_ms = 10\nseed = 9\n\n[rewards]\nredemption_enabled = false"
        )
        .unwrap();

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.ledger.initial_balance, 500);
        assert_eq!(config.analysis.delay, Duration::from_millis(10));
        assert_eq!(config.analysis.seed, Some(9));
        assert!(!config.rewards.redemption_enabled);
        assert_eq!(config.source, ConfigSource::File);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]\ninitial_balance = 500").unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("GREENHERO_INITIAL_BALANCE", "900"),
            ("GREENHERO_REDEMPTION_ENABLED", "off"),
        ]);
        let config = load_config_with_env(Some(file.path().to_path_buf()), |k| {
            env.get(k).map(|v| (*v).to_string())
        })
        .unwrap();
        assert_eq!(config.ledger.initial_balance, 900);
        assert!(!config.rewards.redemption_enabled);
        assert_eq!(config.source, ConfigSource::Env);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = load_config_with_env(None, |k| {
            (k == "GREENHERO_VEGETARIAN_PROBABILITY").then(|| "1.5".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unparseable_env_rejected() {
        let err = load_config_with_env(None, |k| {
            (k == "GREENHERO_ANALYSIS_DELAY_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[ledger\ninitial_balance = ").unwrap();
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_mock_config_mapping() {
        let mut config = GreenConfig::default();
        config.analysis.delay = Duration::from_millis(5);
        config.analysis.seed = Some(1);
        let mock = config.analysis.mock_config();
        assert_eq!(mock.delay, Duration::from_millis(5));
        assert_eq!(mock.seed, Some(1));
    }
}

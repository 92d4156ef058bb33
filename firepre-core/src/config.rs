//! Configuration file support
//!
//! Loads engine configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.fireprerc.json` in the working root
//! 3. `firepre.config.json` in the working root
//!
//! All fields are optional; defaults reproduce the fixed tables the
//! scoring engine ships with.

use crate::grid::DEFAULT_GRID_SIZE;
use crate::risk::FactorWeights;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default model invocation timeout in milliseconds
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 2000;
/// Default directory probed for model artifacts
pub const DEFAULT_MODELS_DIR: &str = "models";

/// Engine configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirepreConfig {
    /// Custom heuristic factor weights
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Directory probed for model artifacts (default: "models")
    #[serde(default)]
    pub models_dir: Option<PathBuf>,

    /// Model invocation timeout in milliseconds (default: 2000)
    #[serde(default)]
    pub model_timeout_ms: Option<u64>,

    /// Feature grid edge length in pixels (default: 128)
    #[serde(default)]
    pub grid_size: Option<usize>,
}

/// Custom heuristic factor weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    /// Weight for temperature (default: 0.30)
    pub temperature: Option<f64>,
    /// Weight for humidity (default: 0.25)
    pub humidity: Option<f64>,
    /// Weight for wind speed (default: 0.20)
    pub wind: Option<f64>,
    /// Weight for precipitation (default: 0.15)
    pub precipitation: Option<f64>,
    /// Weight for vegetation density (default: 0.10)
    pub vegetation: Option<f64>,
}

/// Resolved configuration ready for use by the engine
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub weights: FactorWeights,
    pub models_dir: PathBuf,
    pub model_timeout: Duration,
    pub grid_size: usize,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            weights: FactorWeights::default(),
            models_dir: PathBuf::from(DEFAULT_MODELS_DIR),
            model_timeout: Duration::from_millis(DEFAULT_MODEL_TIMEOUT_MS),
            grid_size: DEFAULT_GRID_SIZE,
            config_path: None,
        }
    }
}

impl FirepreConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref w) = self.weights {
            let resolved = resolve_weights(w);
            for (name, value) in [
                ("temperature", resolved.temperature),
                ("humidity", resolved.humidity),
                ("wind", resolved.wind),
                ("precipitation", resolved.precipitation),
                ("vegetation", resolved.vegetation),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    anyhow::bail!("weights.{} must be in [0,1] (got {})", name, value);
                }
            }
            // Weights summing to 1.0 keep the heuristic score in [0,1]
            let sum = resolved.sum();
            if (sum - 1.0).abs() > 1e-9 {
                anyhow::bail!("weights must sum to 1.0 (got {})", sum);
            }
        }

        if let Some(timeout) = self.model_timeout_ms {
            if timeout == 0 {
                anyhow::bail!("model_timeout_ms must be positive");
            }
        }

        if let Some(size) = self.grid_size {
            if !(8..=1024).contains(&size) {
                anyhow::bail!("grid_size must be between 8 and 1024 (got {})", size);
            }
        }

        Ok(())
    }

    /// Resolve config into the form the engine consumes
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let weights = match &self.weights {
            Some(w) => resolve_weights(w),
            None => FactorWeights::default(),
        };

        Ok(ResolvedConfig {
            weights,
            models_dir: self
                .models_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR)),
            model_timeout: Duration::from_millis(
                self.model_timeout_ms.unwrap_or(DEFAULT_MODEL_TIMEOUT_MS),
            ),
            grid_size: self.grid_size.unwrap_or(DEFAULT_GRID_SIZE),
            config_path: None,
        })
    }
}

fn resolve_weights(w: &WeightConfig) -> FactorWeights {
    let defaults = FactorWeights::default();
    FactorWeights {
        temperature: w.temperature.unwrap_or(defaults.temperature),
        humidity: w.humidity.unwrap_or(defaults.humidity),
        wind: w.wind.unwrap_or(defaults.wind),
        precipitation: w.precipitation.unwrap_or(defaults.precipitation),
        vegetation: w.vegetation.unwrap_or(defaults.vegetation),
    }
}

/// Discover a config file in the working root
///
/// Search order:
/// 1. `.fireprerc.json`
/// 2. `firepre.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(root: &Path) -> Result<Option<(FirepreConfig, PathBuf)>> {
    let rc_path = root.join(".fireprerc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = root.join("firepre.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<FirepreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: FirepreConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for the engine.
///
/// If `config_path` is provided, loads from that file. Otherwise
/// discovers config from the working root. Returns defaults if nothing
/// is found.
pub fn load_and_resolve(root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(root)? {
            Some((config, path)) => (config, Some(path)),
            None => (FirepreConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

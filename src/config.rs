//! Detection and stream configuration.
//!
//! [`DetectionConfig`] is the immutable, validated pair of parameters the
//! detector needs. [`Config`] is the YAML file layout used by the
//! `trueno-anomaly` binary, with precedence: CLI > file > defaults.
//!
//! ```yaml
//! version: 1
//! detection:
//!   window_size: 30
//!   threshold: 3.0
//! stream:
//!   length: 1000
//!   period: 50.0
//!   anomaly_prob: 0.02
//!   seed: 42
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of observations in the statistical baseline.
pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// Default z-score threshold.
pub const DEFAULT_THRESHOLD: f64 = 3.0;

// ============================================================================
// DetectionConfig
// ============================================================================

/// Validated detector parameters.
///
/// Fields are private so a value can only come out of [`DetectionConfig::new`],
/// which never clamps: out-of-range input is an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionConfig {
    window_size: usize,
    threshold: f64,
}

impl DetectionConfig {
    /// Creates a detection configuration.
    ///
    /// # Arguments
    ///
    /// * `window_size` - Observations considered for statistics. Must be > 0.
    /// * `threshold` - Standard deviations that constitute an anomaly. Must be
    ///   finite and > 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the offending key.
    pub fn new(window_size: usize, threshold: f64) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::invalid("window_size", "must be greater than 0"));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::invalid(
                "threshold",
                format!("must be a finite number greater than 0, got {threshold}"),
            ));
        }
        Ok(Self {
            window_size,
            threshold,
        })
    }

    /// Number of observations in the window.
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Z-score threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

// ============================================================================
// File configuration
// ============================================================================

/// `detection` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSection {
    /// Number of observations in the window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Z-score threshold.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}
fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for DetectionSection {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            threshold: default_threshold(),
        }
    }
}

/// Parameters of the synthetic stream source.
///
/// Each value is `sin(2*pi*i / period)` plus Gaussian noise, with an
/// occasional Gaussian spike added with probability `anomaly_prob`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Number of observations to generate.
    #[serde(default = "default_length")]
    pub length: usize,

    /// Period of the seasonal component, in steps.
    #[serde(default = "default_period")]
    pub period: f64,

    /// Probability that a step carries an injected spike.
    #[serde(default = "default_anomaly_prob")]
    pub anomaly_prob: f64,

    /// Standard deviation of the background noise.
    #[serde(default = "default_noise_std")]
    pub noise_std: f64,

    /// Mean of an injected spike.
    #[serde(default = "default_spike_mean")]
    pub spike_mean: f64,

    /// Standard deviation of an injected spike.
    #[serde(default = "default_spike_std")]
    pub spike_std: f64,

    /// RNG seed; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_length() -> usize {
    1000
}
fn default_period() -> f64 {
    50.0
}
fn default_anomaly_prob() -> f64 {
    0.02
}
fn default_noise_std() -> f64 {
    0.1
}
fn default_spike_mean() -> f64 {
    5.0
}
fn default_spike_std() -> f64 {
    2.0
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            period: default_period(),
            anomaly_prob: default_anomaly_prob(),
            noise_std: default_noise_std(),
            spike_mean: default_spike_mean(),
            spike_std: default_spike_std(),
            seed: None,
        }
    }
}

impl StreamConfig {
    /// Checks every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if !self.period.is_finite() || self.period <= 0.0 {
            return Err(Error::invalid(
                "period",
                format!("must be finite and > 0, got {}", self.period),
            ));
        }
        if !(0.0..=1.0).contains(&self.anomaly_prob) {
            return Err(Error::invalid(
                "anomaly_prob",
                format!("must be within [0, 1], got {}", self.anomaly_prob),
            ));
        }
        check_spread("noise_std", self.noise_std)?;
        check_spread("spike_std", self.spike_std)?;
        if !self.spike_mean.is_finite() {
            return Err(Error::invalid("spike_mean", "must be finite"));
        }
        Ok(())
    }
}

fn check_spread(key: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        let message = format!("must be finite and >= 0, got {value}");
        return Err(Error::invalid(key, message));
    }
    Ok(())
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Detector settings.
    #[serde(default)]
    pub detection: DetectionSection,

    /// Synthetic stream settings.
    #[serde(default)]
    pub stream: StreamConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            detection: DetectionSection::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<config_dir>/trueno-anomaly/config.yaml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trueno-anomaly").join("config.yaml"))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the line number if parsing fails,
    /// or [`Error::InvalidConfig`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(Error::ConfigNotFound(_)) => Self::default(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring invalid config file"
                );
                Self::default()
            }
        }
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        self.detection()?;
        self.stream.validate()
    }

    /// Validated detector parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the section is out of range.
    pub fn detection(&self) -> Result<DetectionConfig> {
        DetectionConfig::new(self.detection.window_size, self.detection.threshold)
    }
}

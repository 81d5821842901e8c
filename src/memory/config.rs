use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Capacity must be at least 1")]
    ZeroCapacity,
    #[error("Decay rate must be finite and non-negative, got {0}")]
    InvalidDecayRate(f64),
    #[error("Confidence boost must be finite and non-negative, got {0}")]
    InvalidBoost(f64),
    #[error("Confidence cap must be finite, got {0}")]
    InvalidCap(f64),
    #[error("First id must leave room for at least one insertion, got {0}")]
    InvalidFirstId(u64),
    #[error("Fading threshold must be finite, got {0}")]
    InvalidFadingThreshold(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a retention buffer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Hard upper bound on the number of retained items
    pub capacity: usize,
    /// Exponential forgetting coefficient per unit of logical time
    pub decay_rate: f64,
    /// Confidence added on every query
    pub confidence_boost: f64,
    /// Ceiling applied after a query boost
    pub confidence_cap: f64,
    /// Items scoring below this are flagged as fading in snapshots
    pub fading_threshold: f64,
    /// Id handed to the first inserted item
    pub first_id: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            capacity: 12,
            decay_rate: 0.05,
            confidence_boost: 0.1,
            confidence_cap: 1.0,
            fading_threshold: 0.2,
            first_id: 1,
        }
    }
}

impl RetentionConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    pub fn with_first_id(mut self, first_id: u64) -> Self {
        self.first_id = first_id;
        self
    }

    /// Rejects configurations the buffer cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(ConfigError::InvalidDecayRate(self.decay_rate));
        }
        if !self.confidence_boost.is_finite() || self.confidence_boost < 0.0 {
            return Err(ConfigError::InvalidBoost(self.confidence_boost));
        }
        if !self.confidence_cap.is_finite() {
            return Err(ConfigError::InvalidCap(self.confidence_cap));
        }
        if !self.fading_threshold.is_finite() {
            return Err(ConfigError::InvalidFadingThreshold(self.fading_threshold));
        }
        if self.first_id == u64::MAX {
            return Err(ConfigError::InvalidFirstId(self.first_id));
        }
        Ok(())
    }

    /// Parses and validates a TOML document; missing keys take defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

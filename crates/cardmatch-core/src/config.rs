//! Configuration schema (cardmatch.toml)

use serde::{Deserialize, Serialize};
use crate::identity::MIN_IDENTITY_LEN;
use crate::tier::{ConfidenceTier, TierTable};

/// Placeholder drawn in gap cells of a diff
pub const DEFAULT_GAP_GLYPH: char = '·';

/// Suggestions returned per card unless configured otherwise
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Matching limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Identities shorter than this (after whitespace removal) are never compared.
    /// May be raised above `MIN_IDENTITY_LEN`, never lowered.
    #[serde(default = "MatchingConfig::default_min_identity_len")]
    pub min_identity_len: usize,

    /// Upper bound on suggestions per card
    #[serde(default = "MatchingConfig::default_max_suggestions")]
    pub max_suggestions: usize,
}

impl MatchingConfig {
    fn default_min_identity_len() -> usize {
        MIN_IDENTITY_LEN
    }

    fn default_max_suggestions() -> usize {
        DEFAULT_MAX_SUGGESTIONS
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_identity_len: MIN_IDENTITY_LEN,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// Diff rendering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_gap_glyph")]
    pub gap_glyph: char,
}

impl DisplayConfig {
    fn default_gap_glyph() -> char {
        DEFAULT_GAP_GLYPH
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            gap_glyph: DEFAULT_GAP_GLYPH,
        }
    }
}

/// Suggestion memo cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds; 0 disables the cache
    #[serde(default = "CacheConfig::default_ttl_secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    fn default_ttl_secs() -> u64 {
        300
    }

    /// Whether a cache should be built at all
    pub fn enabled(&self) -> bool {
        self.ttl_secs > 0
    }

    pub fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: Self::default_ttl_secs(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Confidence tier thresholds
    #[serde(default)]
    pub tiers: TierTable,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Reject settings the ranker cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matching.min_identity_len < MIN_IDENTITY_LEN {
            return Err(ConfigError::Invalid(format!(
                "matching.min_identity_len must be at least {}, got {}",
                MIN_IDENTITY_LEN, self.matching.min_identity_len
            )));
        }

        if self.matching.max_suggestions == 0 {
            return Err(ConfigError::Invalid(
                "matching.max_suggestions must be at least 1".to_string(),
            ));
        }

        for tier in ConfidenceTier::ALL {
            let score = self.tiers.threshold(tier).min_score;
            if !(0.0..=1.0).contains(&score) {
                return Err(ConfigError::Invalid(format!(
                    "tiers.{}.min_score must be within 0.0..=1.0, got {}",
                    tier.as_str(),
                    score
                )));
            }
        }

        let pairs = [
            (ConfidenceTier::High, ConfidenceTier::Medium),
            (ConfidenceTier::Medium, ConfidenceTier::Low),
        ];
        for (stricter, looser) in pairs {
            let stricter_threshold = self.tiers.threshold(stricter);
            if !stricter_threshold.is_at_least_as_strict_as(self.tiers.threshold(looser)) {
                return Err(ConfigError::Invalid(format!(
                    "tiers.{} must be at least as strict as tiers.{}",
                    stricter.as_str(),
                    looser.as_str()
                )));
            }
        }

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

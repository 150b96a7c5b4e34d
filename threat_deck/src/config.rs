//! Game configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! playable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DeckError, Result};
use crate::risk::DEFAULT_SEVERITY_CAP;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub narrative: NarrativeConfig,
}

/// Session and scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of cards drawn for the mixed deck.
    pub mixed_deck_size: usize,
    /// Score at which the severity meter is full.
    pub severity_cap: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mixed_deck_size: 3,
            severity_cap: DEFAULT_SEVERITY_CAP,
        }
    }
}

/// How narrative failures are papered over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// A fixed message.
    #[default]
    Static,
    /// A short digest computed from the ledger or card.
    Digest,
}

/// Narrative service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    pub fallback: FallbackStrategy,
    /// Directory prefix for locally resolved card illustrations.
    pub image_dir: String,
    pub image_extension: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackStrategy::Static,
            image_dir: "images".to_string(),
            image_extension: "png".to_string(),
        }
    }
}

impl GameConfig {
    /// Environment variable for config path override.
    pub const ENV_CONFIG_PATH: &'static str = "THREAT_DECK_CONFIG";

    /// Default config filename.
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "threat_deck.toml";

    /// Load configuration from `THREAT_DECK_CONFIG` or `./threat_deck.toml`.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var(Self::ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME));

        if !path.exists() {
            tracing::info!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(contents).map_err(DeckError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.session.severity_cap == 0 {
            return Err(DeckError::InvalidConfig(
                "session.severity_cap must be positive".to_string(),
            ));
        }
        if self.session.mixed_deck_size == 0 {
            return Err(DeckError::InvalidConfig(
                "session.mixed_deck_size must be positive".to_string(),
            ));
        }
        if self.narrative.image_extension.trim().is_empty() {
            tracing::warn!("narrative.image_extension is empty; image paths will have no extension");
        }
        Ok(())
    }
}

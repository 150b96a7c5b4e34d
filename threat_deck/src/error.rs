//! Error types for catalog loading and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading static content or configuration.
///
/// Session commands never produce these; they only surface at startup.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[source] toml::de::Error),

    #[error("invalid card {code}: {reason}")]
    InvalidCard { code: String, reason: String },

    #[error("invalid deck {id}: {reason}")]
    InvalidDeck { id: String, reason: String },

    #[error("card code {code} appears in both {first_deck} and {second_deck}")]
    DuplicateCard {
        code: String,
        first_deck: String,
        second_deck: String,
    },

    #[error("duplicate deck id {0}")]
    DuplicateDeck(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[source] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl DeckError {
    pub(crate) fn invalid_card(code: impl Into<String>, reason: impl Into<String>) -> Self {
        DeckError::InvalidCard {
            code: code.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_deck(id: impl Into<String>, reason: impl Into<String>) -> Self {
        DeckError::InvalidDeck {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for fallible catalog and config operations.
pub type Result<T> = std::result::Result<T, DeckError>;

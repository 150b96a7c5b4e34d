//! Narrative error types.
//!
//! None of these reach the player: the narrative service turns every backend
//! failure into fallback text. They exist for backends and for loading the
//! enrichment table.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative backend unavailable")]
    Unavailable,

    #[error("narrative backend failed: {0}")]
    Backend(String),

    #[error("narrative backend returned empty text")]
    EmptyResponse,

    #[error("failed to parse security details: {0}")]
    EnrichmentParse(#[source] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, NarrativeError>;

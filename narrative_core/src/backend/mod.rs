//! Narrative backends - the pluggable text source behind the service.
//!
//! A backend may fail in any way it likes; `NarrativeService` turns every
//! failure into fallback text, so implementations just return errors.

mod generator;
mod template;

pub use generator::*;
pub use template::*;

use async_trait::async_trait;

use threat_deck::{BacklogItem, Card};

use crate::error::{NarrativeError, Result};

/// Source of narrative text.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Executive summary of a final ledger.
    async fn summarize(&self, ledger: &[BacklogItem]) -> Result<String>;

    /// Extended intelligence text for one card.
    async fn elaborate(&self, card: &Card) -> Result<String>;
}

/// Backend for running without any text source; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

#[async_trait]
impl NarrativeBackend for UnavailableBackend {
    async fn summarize(&self, _ledger: &[BacklogItem]) -> Result<String> {
        Err(NarrativeError::Unavailable)
    }

    async fn elaborate(&self, _card: &Card) -> Result<String> {
        Err(NarrativeError::Unavailable)
    }
}

//! Backend that drives an external text generator with assembled prompts.

use async_trait::async_trait;
use std::sync::Arc;

use threat_deck::{BacklogItem, Card};

use super::NarrativeBackend;
use crate::enrichment::EnrichmentLookup;
use crate::error::Result;
use crate::prompt::{intel_prompt, summary_prompt};

/// Anything that turns a prompt into text: an HTTP model client, a local
/// model, a test double.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Narrative backend that renders prompts and forwards them to a generator.
pub struct PromptBackend<G> {
    generator: G,
    enrichment: Arc<EnrichmentLookup>,
}

impl<G: TextGenerator> PromptBackend<G> {
    pub fn new(generator: G, enrichment: Arc<EnrichmentLookup>) -> Self {
        Self {
            generator,
            enrichment,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }
}

#[async_trait]
impl<G: TextGenerator> NarrativeBackend for PromptBackend<G> {
    async fn summarize(&self, ledger: &[BacklogItem]) -> Result<String> {
        let prompt = summary_prompt(ledger);
        tracing::debug!(risks = ledger.len(), chars = prompt.len(), "requesting summary");
        self.generator.generate(&prompt).await
    }

    async fn elaborate(&self, card: &Card) -> Result<String> {
        let prompt = intel_prompt(card, self.enrichment.lookup_card(card));
        tracing::debug!(card = %card.code(), chars = prompt.len(), "requesting intel");
        self.generator.generate(&prompt).await
    }
}

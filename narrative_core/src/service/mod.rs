//! Narrative service - backend calls with caching and guaranteed fallbacks.
//!
//! Callers always get text back. Backend errors and empty responses are
//! logged and replaced by the configured fallback; they never surface as
//! errors and never touch session state.

mod fallback;

pub use fallback::*;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use threat_deck::{BacklogItem, Card, CardCode, NarrativeConfig, EMPTY_LEDGER_SUMMARY};

use crate::backend::NarrativeBackend;
use crate::error::NarrativeError;

pub struct NarrativeService {
    backend: Arc<dyn NarrativeBackend>,
    config: NarrativeConfig,
    /// Successful intel texts keyed by normalized card code.
    intel_cache: RwLock<HashMap<String, String>>,
}

impl NarrativeService {
    pub fn new(backend: Arc<dyn NarrativeBackend>, config: NarrativeConfig) -> Self {
        Self {
            backend,
            config,
            intel_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Executive summary of a final ledger.
    pub async fn summarize(&self, ledger: &[BacklogItem]) -> String {
        if ledger.is_empty() {
            return EMPTY_LEDGER_SUMMARY.to_string();
        }

        match non_empty(self.backend.summarize(ledger).await) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, risks = ledger.len(), "summary generation failed, using fallback");
                self.config.fallback.summary_fallback(ledger)
            }
        }
    }

    /// Extended intelligence for a card. Successful results are cached.
    pub async fn elaborate(&self, card: &Card) -> String {
        let key = card.code().normalized();

        if let Some(text) = self.intel_cache.read().await.get(&key) {
            tracing::debug!(card = %key, "intel cache hit");
            return text.clone();
        }

        match non_empty(self.backend.elaborate(card).await) {
            Ok(text) => {
                // Concurrent requests for the same card may both write; last one wins.
                self.intel_cache.write().await.insert(key, text.clone());
                text
            }
            Err(err) => {
                tracing::warn!(error = %err, card = %key, "intel generation failed, using fallback");
                self.config.fallback.intel_fallback(card)
            }
        }
    }

    /// Cached intel for a card code, if any.
    pub async fn cached_intel(&self, code: &CardCode) -> Option<String> {
        self.intel_cache.read().await.get(&code.normalized()).cloned()
    }

    pub async fn clear_cache(&self) {
        self.intel_cache.write().await.clear();
    }

    /// Local image path for a card code: `<image_dir>/<code>.<ext>`.
    pub fn illustrate(&self, code: &CardCode) -> String {
        let dir = self.config.image_dir.trim_end_matches('/');
        let ext = self.config.image_extension.trim_start_matches('.');
        match (dir.is_empty(), ext.is_empty()) {
            (true, true) => code.to_string(),
            (true, false) => format!("{}.{}", code, ext),
            (false, true) => format!("{}/{}", dir, code),
            (false, false) => format!("{}/{}.{}", dir, code, ext),
        }
    }

    /// The card's own illustration if it has one, else the local path.
    pub fn illustration_for(&self, card: &Card) -> String {
        match card.illustration().filter(|i| !i.trim().is_empty()) {
            Some(image) => image.to_string(),
            None => self.illustrate(card.code()),
        }
    }
}

fn non_empty(result: crate::Result<String>) -> crate::Result<String> {
    match result {
        Ok(text) if text.trim().is_empty() => Err(NarrativeError::EmptyResponse),
        other => other,
    }
}

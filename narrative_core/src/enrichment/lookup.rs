//! Case-insensitive table of security details.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use threat_deck::Card;

use super::SecurityDetail;
use crate::error::{NarrativeError, Result};

#[derive(Debug, Deserialize)]
struct DetailsFile {
    #[serde(default)]
    security_details: HashMap<String, SecurityDetail>,
}

/// Read-only enrichment table, keyed by upper-cased card or category code.
///
/// Loaded once at startup and shared behind an `Arc` across narrative
/// requests.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentLookup {
    details: HashMap<String, SecurityDetail>,
}

impl EnrichmentLookup {
    /// Create an empty lookup. Every query returns `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-parsed records; keys are normalized.
    pub fn from_details(details: impl IntoIterator<Item = (String, SecurityDetail)>) -> Self {
        let mut normalized = HashMap::new();
        for (key, detail) in details {
            let key = key.trim().to_uppercase();
            if normalized.insert(key.clone(), detail).is_some() {
                tracing::warn!(key = %key, "duplicate security detail key, keeping the last one");
            }
        }
        Self {
            details: normalized,
        }
    }

    /// Parse the `{"security_details": {...}}` document.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let file: DetailsFile =
            serde_json::from_str(contents).map_err(NarrativeError::EnrichmentParse)?;
        let lookup = Self::from_details(file.security_details);
        tracing::debug!(entries = lookup.len(), "loaded security details");
        Ok(lookup)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| NarrativeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Look up a record by code, ignoring case. Absence is not an error.
    pub fn lookup(&self, code: &str) -> Option<&SecurityDetail> {
        let key = code.trim();
        if key.is_empty() {
            return None;
        }
        self.details.get(&key.to_uppercase())
    }

    /// Best record for a card: its own code first, then its risk domain,
    /// then its STRIDE category name.
    pub fn lookup_card(&self, card: &Card) -> Option<&SecurityDetail> {
        self.lookup(card.code().as_str())
            .or_else(|| card.risk_domain().and_then(|d| self.lookup(d)))
            .or_else(|| self.lookup(card.category().name()))
    }

    /// All records in key order.
    pub fn all(&self) -> BTreeMap<&str, &SecurityDetail> {
        self.details
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Fill every incomplete record with placeholder text.
    ///
    /// Returns the number of records that changed.
    pub fn complete_all(&mut self) -> usize {
        self.details
            .iter_mut()
            .map(|(key, detail)| detail.complete(key))
            .filter(|changed| *changed)
            .count()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use threat_deck::{RiskLevel, StrideCategory};

    const SAMPLE: &str = r#"{
        "security_details": {
            "auth-01": {
                "name": "Credential Stuffing",
                "technical_description": "Automated login attempts with leaked credentials.",
                "how_to_prevent": ["Rate limit logins", "Enforce MFA"]
            },
            "SSRF": {
                "name": "Server-Side Request Forgery",
                "qual_o_risco": ["Access to internal metadata endpoints."]
            },
            "Tampering": {
                "name": "Tampering"
            }
        }
    }"#;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let lookup = EnrichmentLookup::from_json_str(SAMPLE).unwrap();

        assert_eq!(lookup.len(), 3);
        let detail = lookup.lookup("Auth-01").unwrap();
        assert_eq!(detail.name.as_deref(), Some("Credential Stuffing"));
        assert_eq!(lookup.lookup("ssrf").unwrap().risk.len(), 1);
    }

    #[test]
    fn test_missing_key_is_none() {
        let lookup = EnrichmentLookup::from_json_str(SAMPLE).unwrap();
        assert!(lookup.lookup("NOPE-99").is_none());
        assert!(lookup.lookup("").is_none());
        assert!(EnrichmentLookup::new().lookup("AUTH-01").is_none());
    }

    #[test]
    fn test_malformed_document_fails_at_load() {
        let err = EnrichmentLookup::from_json_str(r#"{"security_details": {"X": 42}}"#)
            .unwrap_err();
        assert!(matches!(err, NarrativeError::EnrichmentParse(_)));

        let err = EnrichmentLookup::from_json_str("not json").unwrap_err();
        assert!(matches!(err, NarrativeError::EnrichmentParse(_)));
    }

    #[test]
    fn test_missing_section_is_empty() {
        let lookup = EnrichmentLookup::from_json_str("{}").unwrap();
        assert!(lookup.is_empty());
    }

    #[test]
    fn test_lookup_card_falls_back_to_category() {
        let lookup = EnrichmentLookup::from_json_str(SAMPLE).unwrap();

        let own = Card::new(
            "AUTH-01",
            "Brute Force",
            StrideCategory::Spoofing,
            RiskLevel::High,
            RiskLevel::High,
            "Endless keys at the gate.",
        );
        assert_eq!(
            lookup.lookup_card(&own).unwrap().name.as_deref(),
            Some("Credential Stuffing")
        );

        let by_category = Card::new(
            "API-02",
            "Altered Caravan",
            StrideCategory::Tampering,
            RiskLevel::Medium,
            RiskLevel::Low,
            "Cargo swapped on the road.",
        );
        assert_eq!(
            lookup.lookup_card(&by_category).unwrap().name.as_deref(),
            Some("Tampering")
        );
    }

    #[test]
    fn test_complete_all() {
        let mut lookup = EnrichmentLookup::from_json_str(SAMPLE).unwrap();
        assert_eq!(lookup.complete_all(), 3);
        assert!(lookup.all().values().all(|d| d.is_complete()));
        assert_eq!(lookup.complete_all(), 0);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let lookup = EnrichmentLookup::load_from_path(file.path()).unwrap();
        assert!(lookup.lookup("AUTH-01").is_some());

        let err = EnrichmentLookup::load_from_path(Path::new("/nonexistent/details.json"))
            .unwrap_err();
        assert!(matches!(err, NarrativeError::Io { .. }));
    }
}

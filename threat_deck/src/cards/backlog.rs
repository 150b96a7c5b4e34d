//! Backlog items - cards the player accepted as tracked risks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Card, CardCode};

/// Disposition of an accepted risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BacklogStatus {
    #[default]
    Pending,
    /// Reserved for external tooling; no triage command sets it.
    Mitigated,
}

/// A card accepted into the ledger.
///
/// Everything except `status` is fixed at acceptance time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogItem {
    #[serde(flatten)]
    card: Card,
    accepted_at: DateTime<Utc>,
    pub status: BacklogStatus,
}

impl BacklogItem {
    /// Accept a card now.
    pub fn accept(card: Card) -> Self {
        Self::accept_at(card, Utc::now())
    }

    /// Accept a card at a given instant.
    pub fn accept_at(card: Card, accepted_at: DateTime<Utc>) -> Self {
        Self {
            card,
            accepted_at,
            status: BacklogStatus::Pending,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn code(&self) -> &CardCode {
        self.card.code()
    }

    pub fn accepted_at(&self) -> DateTime<Utc> {
        self.accepted_at
    }

    pub fn is_mitigated(&self) -> bool {
        self.status == BacklogStatus::Mitigated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{RiskLevel, StrideCategory};

    fn card() -> Card {
        Card::new(
            "VAULT-01",
            "The Crystal Vault",
            StrideCategory::InformationDisclosure,
            RiskLevel::High,
            RiskLevel::Medium,
            "Gold coins in a glass chest.",
        )
        .with_mitigation("Encrypt sensitive data at rest.")
    }

    #[test]
    fn test_accept_starts_pending() {
        let item = BacklogItem::accept(card());
        assert_eq!(item.status, BacklogStatus::Pending);
        assert!(!item.is_mitigated());
        assert_eq!(item.code().as_str(), "VAULT-01");
    }

    #[test]
    fn test_backlog_item_serializes_flat() {
        let accepted_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let item = BacklogItem::accept_at(card(), accepted_at);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], "VAULT-01");
        assert_eq!(value["category"], "Information Disclosure");
        assert_eq!(value["status"], "pending");

        let back: BacklogItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }
}

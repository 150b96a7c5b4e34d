//! Threat cards and the decks that group them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{CardCode, RiskLevel, StrideCategory};
use crate::error::{DeckError, Result};

/// An external reference backing a card (e.g. an OWASP page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub label: String,
    pub url: Option<String>,
}

/// A single threat scenario.
///
/// Cards are immutable once loaded: fields are only reachable through
/// accessors, and every enumerated attribute is checked at deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord", into = "CardRecord")]
pub struct Card {
    code: CardCode,
    title: String,
    category: StrideCategory,
    impact: RiskLevel,
    probability: RiskLevel,
    description: String,
    hint: Option<String>,
    mitigation: Option<String>,
    reference: Option<ExternalReference>,
    illustration: Option<String>,
    image_prompt: Option<String>,
    risk_domain: Option<String>,
}

impl Card {
    /// Create a card with the required attributes.
    pub fn new(
        code: impl Into<CardCode>,
        title: impl Into<String>,
        category: StrideCategory,
        impact: RiskLevel,
        probability: RiskLevel,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            category,
            impact,
            probability,
            description: description.into(),
            hint: None,
            mitigation: None,
            reference: None,
            illustration: None,
            image_prompt: None,
            risk_domain: None,
        }
    }

    /// Set the hint shown on the back of the card.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set the suggested mitigation.
    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigation = Some(mitigation.into());
        self
    }

    /// Attach an external reference.
    pub fn with_reference(mut self, label: impl Into<String>, url: Option<String>) -> Self {
        self.reference = Some(ExternalReference {
            label: label.into(),
            url,
        });
        self
    }

    /// Set a pre-rendered illustration path.
    pub fn with_illustration(mut self, path: impl Into<String>) -> Self {
        self.illustration = Some(path.into());
        self
    }

    /// Set the prompt used when an illustration has to be generated.
    pub fn with_image_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.image_prompt = Some(prompt.into());
        self
    }

    pub fn code(&self) -> &CardCode {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> StrideCategory {
        self.category
    }

    pub fn impact(&self) -> RiskLevel {
        self.impact
    }

    pub fn probability(&self) -> RiskLevel {
        self.probability
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn mitigation(&self) -> Option<&str> {
        self.mitigation.as_deref()
    }

    pub fn reference(&self) -> Option<&ExternalReference> {
        self.reference.as_ref()
    }

    pub fn illustration(&self) -> Option<&str> {
        self.illustration.as_deref()
    }

    pub fn image_prompt(&self) -> Option<&str> {
        self.image_prompt.as_deref()
    }

    pub fn risk_domain(&self) -> Option<&str> {
        self.risk_domain.as_deref()
    }

    /// Impact weight times probability weight.
    pub fn severity(&self) -> u32 {
        self.impact.weight() * self.probability.weight()
    }
}

/// Flat on-disk shape of a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardRecord {
    id: String,
    title: String,
    category: StrideCategory,
    impact: RiskLevel,
    probability: RiskLevel,
    description: String,
    #[serde(default, alias = "game_hint", skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mitigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    risk_domain: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<CardRecord> for Card {
    type Error = DeckError;

    fn try_from(record: CardRecord) -> Result<Self> {
        let code = record.id.trim().to_string();
        if code.is_empty() {
            return Err(DeckError::invalid_card(record.title, "empty card code"));
        }
        if record.title.trim().is_empty() {
            return Err(DeckError::invalid_card(code, "empty title"));
        }

        let reference_url = non_blank(record.reference_url);
        let reference = match (non_blank(record.reference), reference_url) {
            (Some(label), url) => Some(ExternalReference { label, url }),
            (None, Some(url)) => Some(ExternalReference {
                label: url.clone(),
                url: Some(url),
            }),
            (None, None) => None,
        };

        Ok(Self {
            code: CardCode::new(code),
            title: record.title,
            category: record.category,
            impact: record.impact,
            probability: record.probability,
            description: record.description,
            hint: non_blank(record.hint),
            mitigation: non_blank(record.mitigation),
            reference,
            illustration: non_blank(record.image),
            image_prompt: non_blank(record.image_prompt),
            risk_domain: non_blank(record.risk_domain),
        })
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        let (reference, reference_url) = match card.reference {
            Some(r) => (Some(r.label), r.url),
            None => (None, None),
        };
        Self {
            id: card.code.as_str().to_string(),
            title: card.title,
            category: card.category,
            impact: card.impact,
            probability: card.probability,
            description: card.description,
            hint: card.hint,
            mitigation: card.mitigation,
            reference,
            reference_url,
            image: card.illustration,
            image_prompt: card.image_prompt,
            risk_domain: card.risk_domain,
        }
    }
}

/// A named grouping of cards played as one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    /// Create a deck from its parts.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        description: impl Into<String>,
        cards: Vec<Card>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            description: description.into(),
            cards,
        }
    }

    /// Check that the deck has an id and that its card codes are unique.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(DeckError::invalid_deck(&self.name, "empty deck id"));
        }
        let mut seen = HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.code()) {
                return Err(DeckError::invalid_deck(
                    &self.id,
                    format!("card {} appears more than once", card.code()),
                ));
            }
        }
        Ok(())
    }

    /// Check whether a card code belongs to this deck.
    pub fn contains(&self, code: &CardCode) -> bool {
        self.cards.iter().any(|c| c.code() == code)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

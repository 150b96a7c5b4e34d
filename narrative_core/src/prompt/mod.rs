//! Prompt assembly for text and image generators.
//!
//! Each prompt is built in two steps: gather a serializable context from the
//! ledger or card, then render it with `to_prompt_string`.

use serde::{Deserialize, Serialize};

use threat_deck::{BacklogItem, Card, RiskLevel, StrideCategory};

use crate::enrichment::SecurityDetail;

/// Art direction shared by every card illustration.
const ILLUSTRATION_STYLE: &str = "Antique medieval manuscript illumination, woodcut style, \
aged parchment background, golden ink details, highly detailed historical fantasy art, \
dark and mysterious atmosphere.";

/// One accepted risk as presented to the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub title: String,
    pub category: StrideCategory,
    pub impact: RiskLevel,
    pub scenario: String,
}

impl From<&BacklogItem> for RiskEntry {
    fn from(item: &BacklogItem) -> Self {
        let card = item.card();
        Self {
            title: card.title().to_string(),
            category: card.category(),
            impact: card.impact(),
            scenario: card.description().to_string(),
        }
    }
}

/// Context for the executive summary of a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPrompt {
    pub risks: Vec<RiskEntry>,
}

impl SummaryPrompt {
    pub fn from_ledger(ledger: &[BacklogItem]) -> Self {
        Self {
            risks: ledger.iter().map(RiskEntry::from).collect(),
        }
    }

    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "Act as a Senior Security Architect. Below is a list of security risks a \
development team identified during a threat modeling game.\n\n",
        );

        prompt.push_str("## Accepted Risks\n");
        for risk in &self.risks {
            prompt.push_str(&format!(
                "- Risk: {} ({})\n  Impact: {}\n  Scenario: {}\n",
                risk.title, risk.category, risk.impact, risk.scenario
            ));
        }
        prompt.push('\n');

        prompt.push_str("## Task\n");
        prompt.push_str("Write a short executive summary highlighting:\n");
        prompt.push_str("1. The highest remediation priority.\n");
        prompt.push_str("2. One strategic recommendation for the team's security culture.\n");
        prompt.push_str("3. Three actionable steps for the next sprint.\n\n");
        prompt.push_str("Keep the tone encouraging and practical.\n");

        prompt
    }
}

/// Context for extended threat intelligence on a single card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelPrompt {
    pub title: String,
    pub category: StrideCategory,
    pub description: String,
    /// Known background from the enrichment table, if any.
    pub background: Vec<String>,
}

impl IntelPrompt {
    pub fn for_card(card: &Card, detail: Option<&SecurityDetail>) -> Self {
        let mut background = Vec::new();
        if let Some(detail) = detail {
            background.extend(detail.technical_description.clone());
            background.extend(detail.when_it_occurs.iter().cloned());
            background.extend(detail.risk.iter().cloned());
        }
        Self {
            title: card.title().to_string(),
            category: card.category(),
            description: card.description().to_string(),
            background,
        }
    }

    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!(
            "As a Security Wizard, write a detailed scroll of wisdom about the threat \"{}\" ({}).\n",
            self.title, self.category
        ));
        prompt.push_str(&format!(
            "The threat is described as: \"{}\".\n\n",
            self.description
        ));

        if !self.background.is_empty() {
            prompt.push_str("## Relevant Background\n");
            for line in &self.background {
                prompt.push_str(&format!("- {}\n", line));
            }
            prompt.push('\n');
        }

        prompt.push_str("## Include\n");
        prompt.push_str("1. A technical explanation of how this attack happens in the modern world.\n");
        prompt.push_str("2. A historical or well-known incident of the same kind, if one exists.\n");
        prompt.push_str("3. Arcane (technical) advice on how developers can forge defenses against it.\n\n");
        prompt.push_str("Use a medieval tone, but keep the technical terms precise.\n");

        prompt
    }
}

/// Executive summary prompt for a final ledger.
pub fn summary_prompt(ledger: &[BacklogItem]) -> String {
    SummaryPrompt::from_ledger(ledger).to_prompt_string()
}

/// Threat intelligence prompt for one card.
pub fn intel_prompt(card: &Card, detail: Option<&SecurityDetail>) -> String {
    IntelPrompt::for_card(card, detail).to_prompt_string()
}

/// Image prompt for a card; uses its own prompt text or its title.
pub fn illustration_prompt(card: &Card) -> String {
    let subject = card
        .image_prompt()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(card.title());
    format!("{} Depicting {}.", ILLUSTRATION_STYLE, subject.trim_end_matches('.'))
}

//! Offline backend that composes text from the ledger and the enrichment
//! table. Deterministic, never touches the network.

use async_trait::async_trait;
use std::sync::Arc;

use threat_deck::{BacklogItem, Card, RiskReport, StrideCategory, DEFAULT_SEVERITY_CAP};

use super::NarrativeBackend;
use crate::enrichment::EnrichmentLookup;
use crate::error::{NarrativeError, Result};

const SPRINT_STEPS: usize = 3;

/// Steps used when the ledger has fewer than three risks.
const FILLER_STEPS: [&str; 2] = [
    "Revisit the dismissed and deferred cards with the whole team.",
    "Schedule a follow-up threat modeling session after the next release.",
];

#[derive(Debug, Clone, Default)]
pub struct TemplateBackend {
    enrichment: Arc<EnrichmentLookup>,
}

impl TemplateBackend {
    pub fn new(enrichment: Arc<EnrichmentLookup>) -> Self {
        Self { enrichment }
    }

    /// Best available defense for a card.
    fn defense_for(&self, card: &Card) -> String {
        card.mitigation()
            .map(str::to_string)
            .or_else(|| {
                self.enrichment
                    .lookup_card(card)
                    .and_then(|d| d.how_to_prevent.first().cloned())
            })
            .unwrap_or_else(|| {
                format!(
                    "define a mitigation that restores {}",
                    card.category().violated_property()
                )
            })
    }

    fn culture_advice(&self, category: StrideCategory) -> String {
        let from_table = self
            .enrichment
            .lookup(category.name())
            .and_then(|d| d.how_to_prevent.first().cloned());
        match from_table {
            Some(advice) => advice,
            None => format!(
                "make {} an explicit acceptance criterion for every story that touches it",
                category.violated_property()
            ),
        }
    }
}

#[async_trait]
impl NarrativeBackend for TemplateBackend {
    async fn summarize(&self, ledger: &[BacklogItem]) -> Result<String> {
        // First in acceptance order wins ties.
        let top = ledger
            .iter()
            .rev()
            .max_by_key(|item| item.card().severity())
            .ok_or_else(|| NarrativeError::Backend("nothing to summarize".to_string()))?;

        let report = RiskReport::from_ledger(ledger, DEFAULT_SEVERITY_CAP);
        let mut text = String::new();

        let card = top.card();
        text.push_str(&format!(
            "Highest priority: {} ({}, severity {}). Start with: {}.\n\n",
            card.title(),
            card.category(),
            card.severity(),
            self.defense_for(card).trim_end_matches('.')
        ));

        if let Some(category) = report.dominant_category() {
            text.push_str(&format!(
                "Strategic recommendation: {} dominates this backlog; {}.\n\n",
                category,
                self.culture_advice(category).trim_end_matches('.')
            ));
        }

        let mut ranked: Vec<&BacklogItem> = ledger.iter().collect();
        ranked.sort_by(|a, b| b.card().severity().cmp(&a.card().severity()));

        let mut steps: Vec<String> = ranked
            .iter()
            .take(SPRINT_STEPS)
            .map(|item| {
                format!(
                    "{}: {}.",
                    item.card().title(),
                    self.defense_for(item.card()).trim_end_matches('.')
                )
            })
            .collect();
        steps.extend(
            FILLER_STEPS
                .iter()
                .take(SPRINT_STEPS.saturating_sub(steps.len()))
                .map(|s| s.to_string()),
        );

        text.push_str("Next sprint:\n");
        for (i, step) in steps.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, step));
        }

        Ok(text)
    }

    async fn elaborate(&self, card: &Card) -> Result<String> {
        let mut text = format!(
            "{} ({}, threatens {})\n{}\n",
            card.title(),
            card.category(),
            card.category().violated_property(),
            card.description()
        );

        if let Some(detail) = self.enrichment.lookup_card(card) {
            if let Some(technical) = &detail.technical_description {
                text.push_str(&format!("\nIn practice: {}\n", technical));
            }
            push_section(&mut text, "When it occurs", &detail.when_it_occurs);
            push_section(&mut text, "How to identify", &detail.how_to_identify);
            push_section(&mut text, "What is at stake", &detail.risk);
        }

        text.push_str(&format!("\nDefense: {}\n", self.defense_for(card)));

        if let Some(reference) = card.reference() {
            match &reference.url {
                Some(url) => text.push_str(&format!("Further reading: {} ({})\n", reference.label, url)),
                None => text.push_str(&format!("Further reading: {}\n", reference.label)),
            }
        }

        Ok(text)
    }
}

fn push_section(text: &mut String, heading: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    text.push_str(&format!("\n{}:\n", heading));
    for line in lines {
        text.push_str(&format!("- {}\n", line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threat_deck::RiskLevel;

    fn card(code: &str, category: StrideCategory, impact: RiskLevel, probability: RiskLevel) -> Card {
        Card::new(code, format!("Threat {}", code), category, impact, probability, "Something bad.")
    }

    fn enrichment() -> Arc<EnrichmentLookup> {
        Arc::new(
            EnrichmentLookup::from_json_str(
                r#"{"security_details": {
                    "B": {"how_to_prevent": ["Sign every payload"], "when_it_occurs": ["On upload"]},
                    "Tampering": {"how_to_prevent": ["Review integrity controls each sprint"]}
                }}"#,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_summary_picks_highest_severity() {
        let backend = TemplateBackend::new(enrichment());
        let ledger = vec![
            BacklogItem::accept(card("A", StrideCategory::Spoofing, RiskLevel::Low, RiskLevel::Low)),
            BacklogItem::accept(card("B", StrideCategory::Tampering, RiskLevel::High, RiskLevel::High)),
            BacklogItem::accept(card("C", StrideCategory::Tampering, RiskLevel::Medium, RiskLevel::Low)),
        ];

        let text = backend.summarize(&ledger).await.unwrap();
        assert!(text.starts_with("Highest priority: Threat B (Tampering, severity 9). Start with: Sign every payload."));
        assert!(text.contains("Tampering dominates this backlog; Review integrity controls each sprint."));
        assert!(text.contains("1. Threat B: Sign every payload."));
        assert!(text.contains("3. Threat A: define a mitigation that restores"));
    }

    #[tokio::test]
    async fn test_summary_tie_keeps_acceptance_order() {
        let backend = TemplateBackend::default();
        let ledger = vec![
            BacklogItem::accept(card("FIRST", StrideCategory::Repudiation, RiskLevel::Medium, RiskLevel::Medium)),
            BacklogItem::accept(card("SECOND", StrideCategory::Repudiation, RiskLevel::Medium, RiskLevel::Medium)),
        ];

        let text = backend.summarize(&ledger).await.unwrap();
        assert!(text.starts_with("Highest priority: Threat FIRST"));
        assert!(text.contains(&format!("3. {}", FILLER_STEPS[0])));
    }

    #[tokio::test]
    async fn test_summary_of_empty_ledger_fails() {
        let backend = TemplateBackend::default();
        assert!(backend.summarize(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_elaborate_uses_enrichment_and_reference() {
        let backend = TemplateBackend::new(enrichment());
        let card = card("B", StrideCategory::Tampering, RiskLevel::High, RiskLevel::High)
            .with_reference("OWASP A08", Some("https://owasp.org/Top10/A08_2021".to_string()));

        let text = backend.elaborate(&card).await.unwrap();
        assert!(text.contains("threatens Integrity"));
        assert!(text.contains("When it occurs:\n- On upload"));
        assert!(text.contains("Defense: Sign every payload"));
        assert!(text.contains("Further reading: OWASP A08 (https://owasp.org/Top10/A08_2021)"));
    }
}

//! Fallback text used when the backend fails.

use threat_deck::{compute_score, BacklogItem, Card, FallbackStrategy};

pub const STATIC_SUMMARY_FALLBACK: &str =
    "The smart summary could not be generated right now, but your backlog is saved!";

pub const STATIC_INTEL_FALLBACK: &str =
    "The stars are not aligned for this revelation right now.";

/// Renders fallback text for a configured strategy.
pub trait FallbackText {
    fn summary_fallback(&self, ledger: &[BacklogItem]) -> String;
    fn intel_fallback(&self, card: &Card) -> String;
}

impl FallbackText for FallbackStrategy {
    fn summary_fallback(&self, ledger: &[BacklogItem]) -> String {
        match self {
            FallbackStrategy::Static => STATIC_SUMMARY_FALLBACK.to_string(),
            FallbackStrategy::Digest => digest_summary(ledger),
        }
    }

    fn intel_fallback(&self, card: &Card) -> String {
        match self {
            FallbackStrategy::Static => STATIC_INTEL_FALLBACK.to_string(),
            FallbackStrategy::Digest => digest_intel(card),
        }
    }
}

fn digest_summary(ledger: &[BacklogItem]) -> String {
    let top = ledger
        .iter()
        .rev()
        .max_by_key(|item| item.card().severity());

    let Some(top) = top else {
        return STATIC_SUMMARY_FALLBACK.to_string();
    };

    let noun = if ledger.len() == 1 { "risk" } else { "risks" };
    format!(
        "{} accepted {}, total severity {}. Highest priority: {} ({}). Your backlog is saved.",
        ledger.len(),
        noun,
        compute_score(ledger),
        top.card().title(),
        top.card().category()
    )
}

fn digest_intel(card: &Card) -> String {
    let mut text = format!("{} ({}): {}", card.title(), card.category(), card.description());
    if let Some(hint) = card.hint() {
        text.push_str(&format!(" Hint: {}", hint));
    }
    if let Some(mitigation) = card.mitigation() {
        text.push_str(&format!(" Defense: {}", mitigation));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use threat_deck::{RiskLevel, StrideCategory};

    fn card(code: &str, impact: RiskLevel) -> Card {
        Card::new(code, format!("Threat {}", code), StrideCategory::DenialOfService, impact, impact, "Flood.")
    }

    #[test]
    fn test_static_fallbacks() {
        let strategy = FallbackStrategy::Static;
        assert_eq!(strategy.summary_fallback(&[]), STATIC_SUMMARY_FALLBACK);
        assert_eq!(strategy.intel_fallback(&card("X", RiskLevel::Low)), STATIC_INTEL_FALLBACK);
    }

    #[test]
    fn test_digest_summary_is_session_derived() {
        let ledger = vec![
            BacklogItem::accept(card("A", RiskLevel::Low)),
            BacklogItem::accept(card("B", RiskLevel::High)),
        ];
        let text = FallbackStrategy::Digest.summary_fallback(&ledger);
        assert_eq!(
            text,
            "2 accepted risks, total severity 10. Highest priority: Threat B (Denial of Service). Your backlog is saved."
        );
    }

    #[test]
    fn test_digest_intel() {
        let card = card("A", RiskLevel::Low)
            .with_hint("Watch the gates.")
            .with_mitigation("Rate limit.");
        assert_eq!(
            FallbackStrategy::Digest.intel_fallback(&card),
            "Threat A (Denial of Service): Flood. Hint: Watch the gates. Defense: Rate limit."
        );
    }
}

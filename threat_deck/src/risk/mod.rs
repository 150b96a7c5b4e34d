//! Risk aggregation over the accepted-items ledger.
//!
//! Everything here is a pure function of a ledger snapshot. Nothing is
//! cached: the ledger is small and only grows during a session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cards::{BacklogItem, StrideCategory};

/// Suggested upper bound for the severity meter. Not a hard limit.
pub const DEFAULT_SEVERITY_CAP: u32 = 40;

/// Sum of impact weight times probability weight over the ledger.
pub fn compute_score(ledger: &[BacklogItem]) -> u32 {
    ledger.iter().map(|item| item.card().severity()).sum()
}

/// `score / cap`, clamped to `[0, 1]`. A zero cap reads as fully saturated
/// for any positive score.
pub fn severity_fraction(score: u32, cap: u32) -> f32 {
    if cap == 0 {
        return if score > 0 { 1.0 } else { 0.0 };
    }
    (score as f32 / cap as f32).clamp(0.0, 1.0)
}

/// Count of ledger items per category. Zero-count categories are absent.
pub fn category_distribution(ledger: &[BacklogItem]) -> BTreeMap<StrideCategory, usize> {
    let mut distribution = BTreeMap::new();
    for item in ledger {
        *distribution.entry(item.card().category()).or_insert(0) += 1;
    }
    distribution
}

/// Coarse banding of the severity fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityBand {
    /// Below 25% of the cap.
    Contained,
    /// Below 60% of the cap.
    Elevated,
    Critical,
}

impl SeverityBand {
    pub fn from_fraction(fraction: f32) -> Self {
        match fraction {
            x if x < 0.25 => SeverityBand::Contained,
            x if x < 0.60 => SeverityBand::Elevated,
            _ => SeverityBand::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityBand::Contained => "contained",
            SeverityBand::Elevated => "elevated",
            SeverityBand::Critical => "critical",
        }
    }
}

/// Everything the presentation layer shows about the ledger's risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub score: u32,
    pub cap: u32,
    pub fraction: f32,
    pub band: SeverityBand,
    pub distribution: BTreeMap<StrideCategory, usize>,
    pub accepted: usize,
}

impl RiskReport {
    /// Derive a report from a ledger snapshot.
    pub fn from_ledger(ledger: &[BacklogItem], cap: u32) -> Self {
        let score = compute_score(ledger);
        let fraction = severity_fraction(score, cap);
        Self {
            score,
            cap,
            fraction,
            band: SeverityBand::from_fraction(fraction),
            distribution: category_distribution(ledger),
            accepted: ledger.len(),
        }
    }

    /// Fill percentage for a meter widget.
    pub fn percentage(&self) -> f32 {
        self.fraction * 100.0
    }

    /// The category with the most accepted items, if any.
    pub fn dominant_category(&self) -> Option<StrideCategory> {
        self.distribution
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(category, _)| *category)
    }
}

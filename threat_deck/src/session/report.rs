//! End-of-session report.

use serde::{Deserialize, Serialize};

use crate::cards::{BacklogItem, BacklogStatus, CardCode, RiskLevel, StrideCategory};
use crate::risk::RiskReport;

/// One ledger row as shown in the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogRow {
    pub code: CardCode,
    pub title: String,
    pub category: StrideCategory,
    pub impact: RiskLevel,
    pub probability: RiskLevel,
    pub severity: u32,
    pub reference: Option<String>,
    pub reference_url: Option<String>,
    pub status: BacklogStatus,
}

impl From<&BacklogItem> for BacklogRow {
    fn from(item: &BacklogItem) -> Self {
        let card = item.card();
        Self {
            code: card.code().clone(),
            title: card.title().to_string(),
            category: card.category(),
            impact: card.impact(),
            probability: card.probability(),
            severity: card.severity(),
            reference: card.reference().map(|r| r.label.clone()),
            reference_url: card.reference().and_then(|r| r.url.clone()),
            status: item.status,
        }
    }
}

/// Summary of a finished (or in-progress) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub deck_id: String,
    pub deck_name: String,
    pub rows: Vec<BacklogRow>,
    pub risk: RiskReport,
    /// Narrative summary, once one has arrived.
    pub summary: Option<String>,
}

impl SessionReport {
    /// Rows ordered by severity, highest first; ties keep acceptance order.
    pub fn rows_by_severity(&self) -> Vec<&BacklogRow> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.severity.cmp(&a.severity));
        rows
    }

    /// Render the report as plain text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("## Fortification Report: {}\n", self.deck_name));
        out.push_str(&format!(
            "Accepted risks: {} | Score: {} / {} ({})\n\n",
            self.risk.accepted,
            self.risk.score,
            self.risk.cap,
            self.risk.band.label()
        ));

        if !self.risk.distribution.is_empty() {
            out.push_str("## Distribution\n");
            for (category, count) in &self.risk.distribution {
                out.push_str(&format!("- {}: {}\n", category, count));
            }
            out.push('\n');
        }

        if !self.rows.is_empty() {
            out.push_str("## Backlog\n");
            for row in &self.rows {
                out.push_str(&format!(
                    "- [{}] {} ({}) impact {}{}\n",
                    row.code,
                    row.title,
                    row.category,
                    row.impact,
                    row.reference
                        .as_ref()
                        .map(|r| format!(", see {}", r))
                        .unwrap_or_default()
                ));
            }
            out.push('\n');
        }

        if let Some(summary) = &self.summary {
            out.push_str("## Architect's Notes\n");
            out.push_str(summary);
            out.push('\n');
        }

        out
    }
}

//! Security detail records - supplementary explanations for cards.

use serde::{Deserialize, Serialize};

/// Explanatory record keyed by card or category code.
///
/// Only the shape is enforced at load time; any field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecurityDetail {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub technical_description: Option<String>,

    #[serde(default)]
    pub when_it_occurs: Vec<String>,

    #[serde(default)]
    pub how_to_identify: Vec<String>,

    #[serde(default)]
    pub how_to_prevent: Vec<String>,

    /// What is at stake if the threat is exploited.
    #[serde(default, alias = "qual_o_risco")]
    pub risk: Vec<String>,
}

impl SecurityDetail {
    /// Display name, falling back to the lookup key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(key)
    }

    /// Fill every missing field with generated placeholder text.
    ///
    /// Returns `true` if anything was added.
    pub fn complete(&mut self, key: &str) -> bool {
        let name = self.display_name(key).to_string();
        let mut changed = false;

        if self.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            self.name = Some(name.clone());
            changed = true;
        }
        if self
            .technical_description
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
        {
            self.technical_description = Some(format!(
                "Automatically generated technical description for {}. Review and expand as needed.",
                name
            ));
            changed = true;
        }

        changed |= fill(&mut self.when_it_occurs, || {
            vec![
                format!("Typical occurrence related to {}.", name),
                format!("Common scenario where {} can happen.", name),
            ]
        });
        changed |= fill(&mut self.how_to_identify, || {
            vec![
                format!("Check logs and access patterns related to {}.", name),
                format!("Monitor anomalies and spikes that indicate {}.", name),
            ]
        });
        changed |= fill(&mut self.how_to_prevent, || {
            vec![
                format!("Implement specific controls to mitigate {}.", name),
                "Apply validation and security policies.".to_string(),
            ]
        });
        changed |= fill(&mut self.risk, || {
            vec![
                format!("Potential risk associated with {}.", name),
                "Operational and data impact if exploited.".to_string(),
            ]
        });

        changed
    }

    /// Whether every field carries content.
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
            && self
                .technical_description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty())
            && !self.when_it_occurs.is_empty()
            && !self.how_to_identify.is_empty()
            && !self.how_to_prevent.is_empty()
            && !self.risk.is_empty()
    }
}

fn fill(field: &mut Vec<String>, make: impl FnOnce() -> Vec<String>) -> bool {
    if field.is_empty() {
        *field = make();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_fills_gaps() {
        let mut detail = SecurityDetail {
            how_to_prevent: vec!["Use MFA.".to_string()],
            ..Default::default()
        };

        assert!(!detail.is_complete());
        assert!(detail.complete("AUTH-01"));
        assert!(detail.is_complete());

        assert_eq!(detail.name.as_deref(), Some("AUTH-01"));
        assert_eq!(detail.how_to_prevent, vec!["Use MFA.".to_string()]);
        assert!(detail.when_it_occurs[0].contains("AUTH-01"));
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut detail = SecurityDetail::default();
        detail.complete("SSRF");
        let snapshot = detail.clone();

        assert!(!detail.complete("SSRF"));
        assert_eq!(detail, snapshot);
    }

    #[test]
    fn test_display_name() {
        let named = SecurityDetail {
            name: Some("Injection".to_string()),
            ..Default::default()
        };
        assert_eq!(named.display_name("API-03"), "Injection");
        assert_eq!(SecurityDetail::default().display_name("API-03"), "API-03");
    }

    #[test]
    fn test_legacy_risk_key() {
        let detail: SecurityDetail = serde_json::from_value(serde_json::json!({
            "name": "SSRF",
            "qual_o_risco": ["Internal services exposed."]
        }))
        .unwrap();
        assert_eq!(detail.risk, vec!["Internal services exposed.".to_string()]);
    }
}

//! Card and deck definitions.

mod backlog;
mod card;

pub use backlog::*;
pub use card::*;

use serde::{Deserialize, Serialize};

/// Stable code identifying a card across the whole catalog (e.g. `AUTH-01`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCode(String);

impl CardCode {
    /// Create a card code from any string-like value.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased form used for case-insensitive lookups.
    pub fn normalized(&self) -> String {
        self.0.to_uppercase()
    }
}

impl std::fmt::Display for CardCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CardCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// The STRIDE threat taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrideCategory {
    Spoofing,
    Tampering,
    Repudiation,
    #[serde(rename = "Information Disclosure")]
    InformationDisclosure,
    #[serde(rename = "Denial of Service")]
    DenialOfService,
    #[serde(rename = "Elevation of Privilege")]
    ElevationOfPrivilege,
}

impl StrideCategory {
    /// All six categories in taxonomy order.
    pub const ALL: [StrideCategory; 6] = [
        StrideCategory::Spoofing,
        StrideCategory::Tampering,
        StrideCategory::Repudiation,
        StrideCategory::InformationDisclosure,
        StrideCategory::DenialOfService,
        StrideCategory::ElevationOfPrivilege,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrideCategory::Spoofing => "Spoofing",
            StrideCategory::Tampering => "Tampering",
            StrideCategory::Repudiation => "Repudiation",
            StrideCategory::InformationDisclosure => "Information Disclosure",
            StrideCategory::DenialOfService => "Denial of Service",
            StrideCategory::ElevationOfPrivilege => "Elevation of Privilege",
        }
    }

    /// The security property this category violates.
    pub fn violated_property(&self) -> &'static str {
        match self {
            StrideCategory::Spoofing => "Authentication",
            StrideCategory::Tampering => "Integrity",
            StrideCategory::Repudiation => "Non-repudiation",
            StrideCategory::InformationDisclosure => "Confidentiality",
            StrideCategory::DenialOfService => "Availability",
            StrideCategory::ElevationOfPrivilege => "Authorization",
        }
    }
}

impl std::fmt::Display for StrideCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered severity used for both impact and probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "Baixo")]
    Low,
    #[serde(alias = "Médio")]
    Medium,
    #[serde(alias = "Alto")]
    High,
}

impl RiskLevel {
    /// Scoring weight: Low = 1, Medium = 2, High = 3.
    pub fn weight(&self) -> u32 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_weights() {
        assert_eq!(RiskLevel::Low.weight(), 1);
        assert_eq!(RiskLevel::Medium.weight(), 2);
        assert_eq!(RiskLevel::High.weight(), 3);
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_legacy_risk_labels() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: RiskLevel,
        }

        let parsed: Wrapper = toml::from_str(r#"level = "Alto""#).unwrap();
        assert_eq!(parsed.level, RiskLevel::High);
        let parsed: Wrapper = toml::from_str(r#"level = "Médio""#).unwrap();
        assert_eq!(parsed.level, RiskLevel::Medium);
    }

    #[test]
    fn test_category_display_names() {
        let parsed: StrideCategory = serde_json::from_str("\"Denial of Service\"").unwrap();
        assert_eq!(parsed, StrideCategory::DenialOfService);
        assert_eq!(
            StrideCategory::InformationDisclosure.to_string(),
            "Information Disclosure"
        );
        assert_eq!(StrideCategory::ALL.len(), 6);
    }

    #[test]
    fn test_card_code_normalized() {
        let code = CardCode::new("auth-01");
        assert_eq!(code.normalized(), "AUTH-01");
        assert_eq!(code.as_str(), "auth-01");
    }
}

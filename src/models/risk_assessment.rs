use serde::{Deserialize, Serialize};
use std::fmt;

/// Which detector produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDetector {
    TemporalClustering,
    WalletAge,
    VolumeDiversity,
    WashTrading,
    TokenAuthority,
    TopHolders,
    Liquidity,
    Aggregate,
}

/// Evidence severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// One entry of the evidence trail: which detector fired, how severe the
/// finding is, and a human-readable message. Callers can render or localize
/// the text without re-deriving which check produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEvidence {
    pub detector: RiskDetector,
    pub severity: Severity,
    pub message: String,
}

impl RiskEvidence {
    pub fn new(detector: RiskDetector, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            detector,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for RiskEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Final output of a scoring invocation.
///
/// `manipulation_score` is always clamped to [0,100]. `reasons` is an
/// append-only trail in detector execution order, never deduplicated or
/// reordered, and never empty: a neutral entry is appended when no detector
/// fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub manipulation_score: f64,
    pub reasons: Vec<RiskEvidence>,
    pub freeze_authority_present: bool,
    pub mint_authority_present: bool,
    pub top_10_holder_share_pct: f64,
}

impl RiskAssessment {
    /// The evidence trail as plain strings, in recorded order.
    pub fn reason_messages(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.message.clone()).collect()
    }

    /// True when any recorded evidence came from the given detector.
    pub fn has_evidence_from(&self, detector: RiskDetector) -> bool {
        self.reasons.iter().any(|r| r.detector == detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_display_uses_message() {
        let evidence = RiskEvidence::new(
            RiskDetector::WashTrading,
            Severity::Critical,
            "Wash-trading pattern detected",
        );
        assert_eq!(evidence.to_string(), "Wash-trading pattern detected");
    }

    #[test]
    fn test_has_evidence_from() {
        let assessment = RiskAssessment {
            manipulation_score: 42.0,
            reasons: vec![RiskEvidence::new(
                RiskDetector::WalletAge,
                Severity::Warning,
                "New wallet concentration",
            )],
            freeze_authority_present: false,
            mint_authority_present: false,
            top_10_holder_share_pct: 0.0,
        };
        assert!(assessment.has_evidence_from(RiskDetector::WalletAge));
        assert!(!assessment.has_evidence_from(RiskDetector::WashTrading));
    }
}

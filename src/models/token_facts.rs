use serde::{Deserialize, Serialize};

use crate::models::{RiskDetector, RiskEvidence, Severity};

/// Pre-fetched on-chain facts about the analyzed token.
///
/// Supplied wholesale by a collaborator or absent entirely. The engine never
/// performs retrieval; absence of the bundle or of any sub-check degrades to
/// the neutral defaults (`false` / `0.0`). The collaborator that assembled
/// the bundle is responsible for the explanatory evidence accompanying each
/// check, including "data unavailable" notes for checks it had to skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenFacts {
    pub freeze_authority_present: bool,
    pub mint_authority_present: bool,
    /// Percentage of total supply held by the ten largest accounts, [0,100].
    pub top_10_holder_share_pct: f64,
    /// 0.0 = liquidity demonstrably locked or burned, higher = withdrawable.
    pub liquidity_lock_risk: f64,
    /// Collaborator-authored evidence for the checks above, appended to the
    /// assessment trail in the order recorded here.
    pub evidence: Vec<RiskEvidence>,
}

impl TokenFacts {
    /// Neutral bundle for the case where no collaborator data exists at all.
    /// Each skipped check carries its own "data unavailable" note so the
    /// evidence trail explains the degradation.
    pub fn unavailable() -> Self {
        let evidence = vec![
            RiskEvidence::new(
                RiskDetector::TokenAuthority,
                Severity::Info,
                "Authority check: data unavailable, assuming no live authorities.",
            ),
            RiskEvidence::new(
                RiskDetector::TopHolders,
                Severity::Info,
                "Top-holder analysis: data unavailable, assuming 0% concentration.",
            ),
            RiskEvidence::new(
                RiskDetector::Liquidity,
                Severity::Info,
                "Liquidity lock check: data unavailable, assuming neutral lock risk.",
            ),
        ];
        Self {
            freeze_authority_present: false,
            mint_authority_present: false,
            top_10_holder_share_pct: 0.0,
            liquidity_lock_risk: 0.0,
            evidence,
        }
    }
}

use crate::models::RiskAssessment;

/// Caller-side trust score derived from a finished assessment.
///
/// This lives outside the engine on purpose: the derivation is simple
/// arithmetic over the assessment fields and belongs to the consuming layer.
/// `trust = 100 - manipulation_score`, minus 20 for a live freeze authority,
/// minus 20 for a live mint authority, minus 10 when the top-10 holder share
/// exceeds 30%, clamped to [0,100].
pub fn derive_trust_score(assessment: &RiskAssessment) -> f64 {
    let mut trust = (100.0 - assessment.manipulation_score).max(0.0);
    if assessment.freeze_authority_present {
        trust = (trust - 20.0).max(0.0);
    }
    if assessment.mint_authority_present {
        trust = (trust - 20.0).max(0.0);
    }
    if assessment.top_10_holder_share_pct > 30.0 {
        trust = (trust - 10.0).max(0.0);
    }
    trust.clamp(0.0, 100.0)
}

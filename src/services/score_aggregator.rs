use tracing::debug;

use crate::models::{
    EngineConfig, RiskAssessment, RiskDetector, RiskEvidence, Severity, TokenFacts,
};
use crate::services::temporal_cluster::ClusterSignal;
use crate::services::volume_diversity::DiversitySignal;
use crate::services::wallet_age::AgeSignal;
use crate::services::wash_trading::WashSignal;

/// Detector outputs for one scoring invocation. The windowed signals are
/// absent when there were no trades to analyze.
#[derive(Debug, Clone)]
pub struct DetectorSignals {
    pub total_trades: usize,
    pub cluster: Option<ClusterSignal>,
    pub age: Option<AgeSignal>,
    pub diversity: Option<DiversitySignal>,
    pub wash: WashSignal,
}

/// Combines detector signals into the final manipulation score and ordered
/// evidence trail.
///
/// The policy is strictly ordered and monotone: after the base score each
/// rule may only raise the score, never lower it. Evidence is appended in
/// detector execution order and never deduplicated or reordered.
pub struct ScoreAggregator {
    config: EngineConfig,
}

impl ScoreAggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(&self, signals: DetectorSignals, facts: &TokenFacts) -> RiskAssessment {
        let config = &self.config;
        let total = signals.total_trades;
        let mut reasons: Vec<RiskEvidence> = Vec::new();

        if let Some(cluster) = &signals.cluster {
            reasons.extend(cluster.evidence.iter().cloned());
        }
        if let Some(age) = &signals.age {
            reasons.extend(age.evidence.iter().cloned());
        }
        if let Some(diversity) = &signals.diversity {
            reasons.extend(diversity.evidence.iter().cloned());
        }
        reasons.extend(facts.evidence.iter().cloned());

        // Base risk from temporal clustering; without any observable trades
        // the base is a conservative neutral floor, not zero.
        let base = if total > 0 {
            signals
                .cluster
                .as_ref()
                .map(|c| c.sequential_risk * 100.0)
                .unwrap_or(0.0)
        } else {
            reasons.push(RiskEvidence::new(
                RiskDetector::Aggregate,
                Severity::Warning,
                "Insufficient transaction data for depth analysis.",
            ));
            config.no_data_base_score
        };

        reasons.extend(signals.wash.evidence.iter().cloned());

        // Additive modifiers, each capped by its own weight.
        let wallet_age_risk = signals
            .age
            .as_ref()
            .map(|a| a.wallet_age_risk)
            .unwrap_or(0.0);
        let diversity_risk = signals
            .diversity
            .as_ref()
            .map(|d| d.risk())
            .unwrap_or(0.0);
        let modifier = wallet_age_risk * config.wallet_age_weight
            + diversity_risk * config.diversity_weight
            + facts.liquidity_lock_risk * config.liquidity_weight
            + signals.wash.risk() * config.wash_trading_weight;

        let mut score = base + modifier;

        // Concentrated holder structure bumps the score.
        if facts.top_10_holder_share_pct > config.top_holder_share_threshold_pct {
            score = (score + config.top_holder_bonus).min(100.0);
        }

        // No observable market behavior is high-risk by policy, never
        // "unknown = safe".
        if total == 0 && score < config.high_risk_floor {
            score = config.high_risk_floor;
        }

        // A token cannot be rated low-risk while liquidity is withdrawable or
        // a freeze authority remains live.
        if total > 0
            && (facts.liquidity_lock_risk > 0.0 || facts.freeze_authority_present)
            && score < config.high_risk_floor
        {
            score = config.high_risk_floor;
        }

        let manipulation_score = score.clamp(0.0, 100.0);

        if reasons.is_empty() {
            reasons.push(RiskEvidence::new(
                RiskDetector::Aggregate,
                Severity::Info,
                "No strong clustering, new-wallet anomalies, high-volume/low-diversity patterns, wash-trading concentration, or centralized authority risks detected.",
            ));
        }

        debug!(
            base = base,
            modifier = modifier,
            score = manipulation_score,
            total_trades = total,
            "aggregated risk score"
        );

        RiskAssessment {
            manipulation_score,
            reasons,
            freeze_authority_present: facts.freeze_authority_present,
            mint_authority_present: facts.mint_authority_present,
            top_10_holder_share_pct: facts.top_10_holder_share_pct,
        }
    }
}

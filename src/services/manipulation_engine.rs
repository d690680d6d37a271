use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::{EngineConfig, RiskAssessment, TokenFacts, TradeEvent};
use crate::services::score_aggregator::{DetectorSignals, ScoreAggregator};
use crate::services::temporal_cluster::TemporalClusterDetector;
use crate::services::volume_diversity::VolumeDiversityChecker;
use crate::services::wallet_age::WalletAgeAnalyzer;
use crate::services::wash_trading::WashTradingDetector;

/// The manipulation-risk scoring engine.
///
/// A pure function of its inputs plus the explicit `now` instant: no I/O, no
/// clocks, no shared mutable state. Identical inputs always produce identical
/// output, and concurrent invocations need no synchronization. All data must
/// be fully materialized by collaborators before calling in; the engine never
/// waits on anything.
pub struct ManipulationEngine {
    config: EngineConfig,
    cluster_detector: TemporalClusterDetector,
    age_analyzer: WalletAgeAnalyzer,
    diversity_checker: VolumeDiversityChecker,
    wash_detector: WashTradingDetector,
    aggregator: ScoreAggregator,
}

impl ManipulationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cluster_detector: TemporalClusterDetector::new(config.clone()),
            age_analyzer: WalletAgeAnalyzer::new(config.clone()),
            diversity_checker: VolumeDiversityChecker::new(config.clone()),
            wash_detector: WashTradingDetector::new(config.clone()),
            aggregator: ScoreAggregator::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score the supplied trades and optional token facts.
    ///
    /// Input ordering is irrelevant; trades are sorted by timestamp before
    /// any windowed analysis. Missing `facts` degrades to neutral defaults
    /// with explanatory evidence. This call never fails for any in-contract
    /// input shape: degenerate inputs (zero trades, one trade, one wallet)
    /// are handled by explicit policy branches.
    pub fn analyze(
        &self,
        trades: &[TradeEvent],
        facts: Option<&TokenFacts>,
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        let mut sorted: Vec<TradeEvent> = trades.to_vec();
        sorted.sort_by_key(|t| t.timestamp);
        let total = sorted.len();

        let (cluster, age, diversity) = if total > 0 {
            (
                Some(self.cluster_detector.detect(&sorted)),
                Some(self.age_analyzer.analyze(&sorted, now)),
                Some(self.diversity_checker.check(&sorted)),
            )
        } else {
            (None, None, None)
        };
        let wash = self.wash_detector.detect(&sorted);

        let signals = DetectorSignals {
            total_trades: total,
            cluster,
            age,
            diversity,
            wash,
        };

        let unavailable;
        let facts = match facts {
            Some(facts) => facts,
            None => {
                unavailable = TokenFacts::unavailable();
                &unavailable
            }
        };

        let assessment = self.aggregator.aggregate(signals, facts);
        info!(
            total_trades = total,
            score = assessment.manipulation_score,
            "manipulation analysis complete"
        );
        assessment
    }
}

impl Default for ManipulationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

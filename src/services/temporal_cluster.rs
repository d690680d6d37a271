use chrono::Duration;

use crate::models::{EngineConfig, RiskDetector, RiskEvidence, Severity, TradeEvent};

/// Result of the sliding-window clustering analysis.
#[derive(Debug, Clone)]
pub struct ClusterSignal {
    /// Clustering risk in [0,1].
    pub sequential_risk: f64,
    /// Largest number of trades falling inside any single window.
    pub max_in_window: usize,
    /// `max_in_window / total_trades`.
    pub clustered_fraction: f64,
    pub evidence: Option<RiskEvidence>,
}

/// Detects sequential buying: a disproportionate share of trades packed into
/// a short fixed-width time window.
pub struct TemporalClusterDetector {
    config: EngineConfig,
}

impl TemporalClusterDetector {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Analyze trades sorted ascending by timestamp. Callers must not pass an
    /// empty slice; zero trades is handled upstream as a no-data case.
    ///
    /// A single trade yields `clustered_fraction = 1.0` and therefore risk
    /// 1.0. This degenerate case is intentional: one observable trade says
    /// nothing reassuring about the token.
    pub fn detect(&self, trades: &[TradeEvent]) -> ClusterSignal {
        let total = trades.len();
        let window = Duration::seconds(self.config.cluster_window_seconds);

        // Two-pointer sweep: advance the left edge whenever the span exceeds
        // the window width (boundaries inclusive).
        let mut max_in_window = 1usize;
        let mut start = 0usize;
        for end in 0..total {
            while trades[end].timestamp - trades[start].timestamp > window {
                start += 1;
            }
            let window_count = end - start + 1;
            if window_count > max_in_window {
                max_in_window = window_count;
            }
        }

        let clustered_fraction = max_in_window as f64 / total as f64;

        let sequential_risk = if clustered_fraction <= 0.5 {
            0.0
        } else if clustered_fraction >= 1.0 {
            1.0
        } else {
            (clustered_fraction - 0.5) / 0.5
        };

        let evidence = if sequential_risk > 0.0 {
            Some(RiskEvidence::new(
                RiskDetector::TemporalClustering,
                Severity::Warning,
                format!(
                    "Sequential buying detected: {}/{} trades occurred within a {}-second window (clustered_fraction={:.2}).",
                    max_in_window, total, self.config.cluster_window_seconds, clustered_fraction
                ),
            ))
        } else {
            None
        };

        ClusterSignal {
            sequential_risk,
            max_in_window,
            clustered_fraction,
            evidence,
        }
    }
}

use chrono::Duration;
use std::collections::HashSet;

use crate::models::{EngineConfig, RiskDetector, RiskEvidence, Severity, TradeEvent};

/// Result of the trailing-window volume/diversity check.
#[derive(Debug, Clone)]
pub struct DiversitySignal {
    pub flagged: bool,
    /// Trades inside the trailing window.
    pub trade_count: usize,
    /// Distinct wallets inside the trailing window.
    pub unique_wallets: usize,
    pub evidence: Option<RiskEvidence>,
}

impl DiversitySignal {
    /// Binary risk contribution in {0,1}.
    pub fn risk(&self) -> f64 {
        if self.flagged {
            1.0
        } else {
            0.0
        }
    }
}

/// Flags high trade activity with low buyer diversity: most of the sample
/// landing in the trailing window while coming from too few wallets.
/// Thresholds are tuned for small samples (~10 analyzed trades) and live in
/// the engine configuration.
pub struct VolumeDiversityChecker {
    config: EngineConfig,
}

impl VolumeDiversityChecker {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Check trades sorted ascending by timestamp. The window trails the
    /// latest trade, not the caller's clock. Callers must not pass an empty
    /// slice.
    pub fn check(&self, trades: &[TradeEvent]) -> DiversitySignal {
        let latest = trades[trades.len() - 1].timestamp;
        let window_start = latest - Duration::minutes(self.config.diversity_window_minutes);

        let in_window: Vec<&TradeEvent> = trades
            .iter()
            .filter(|t| t.timestamp >= window_start)
            .collect();
        let trade_count = in_window.len();
        let unique_wallets = in_window
            .iter()
            .map(|t| t.wallet.as_str())
            .collect::<HashSet<_>>()
            .len();

        let flagged = trade_count >= self.config.diversity_min_trades
            && unique_wallets < self.config.diversity_max_wallets;

        let evidence = flagged.then(|| {
            RiskEvidence::new(
                RiskDetector::VolumeDiversity,
                Severity::Warning,
                format!(
                    "High trade activity with low buyer diversity in last {} minutes: {} trades from {} unique wallets.",
                    self.config.diversity_window_minutes, trade_count, unique_wallets
                ),
            )
        });

        DiversitySignal {
            flagged,
            trade_count,
            unique_wallets,
            evidence,
        }
    }
}

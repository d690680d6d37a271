use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::models::{EngineConfig, RiskDetector, RiskEvidence, Severity, TradeEvent};
use crate::utils::time::hours_between;

/// Result of the wallet-age distribution analysis.
#[derive(Debug, Clone)]
pub struct AgeSignal {
    /// Age risk in [0,1].
    pub wallet_age_risk: f64,
    /// Distinct wallets seen in the sample.
    pub unique_wallets: usize,
    /// Distinct wallets first seen less than the freshness threshold ago.
    pub new_wallets: usize,
    pub evidence: Vec<RiskEvidence>,
}

/// Infers wallet freshness from the supplied trade window.
///
/// "First seen" is the earliest timestamp observed within the sample only;
/// the engine has no external wallet history, so age is relative to the
/// sample rather than ground truth. The reference instant is an explicit
/// parameter, never a wall clock.
pub struct WalletAgeAnalyzer {
    config: EngineConfig,
}

impl WalletAgeAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Analyze trades sorted ascending by timestamp against `now`.
    pub fn analyze(&self, trades: &[TradeEvent], now: DateTime<Utc>) -> AgeSignal {
        let threshold_hours = self.config.fresh_wallet_threshold_hours;

        let mut first_seen: HashMap<&str, DateTime<Utc>> = HashMap::new();
        for trade in trades {
            let entry = first_seen
                .entry(trade.wallet.as_str())
                .or_insert(trade.timestamp);
            if trade.timestamp < *entry {
                *entry = trade.timestamp;
            }
        }

        let unique_wallets = first_seen.len();
        let new_wallets = first_seen
            .values()
            .filter(|first| hours_between(**first, now) < threshold_hours)
            .count();

        let new_wallet_fraction = new_wallets as f64 / unique_wallets.max(1) as f64;
        let mut wallet_age_risk = new_wallet_fraction.min(1.0);

        let mut evidence = Vec::new();
        if wallet_age_risk > self.config.wallet_age_reason_threshold {
            evidence.push(RiskEvidence::new(
                RiskDetector::WalletAge,
                Severity::Warning,
                format!(
                    "New wallet concentration: {}/{} wallets are younger than {}h (new_wallet_fraction={:.2}).",
                    new_wallets, unique_wallets, threshold_hours, new_wallet_fraction
                ),
            ));
        }

        // Fresh-wallet surge over the most recent trades: distinct wallets in
        // first-occurrence order, fraction younger than the threshold. A
        // surge can only raise the risk, never lower it.
        let sample_start = trades.len().saturating_sub(self.config.surge_sample_size);
        let recent = &trades[sample_start..];
        let mut seen = HashSet::new();
        let mut recent_wallets: Vec<&str> = Vec::new();
        for trade in recent {
            if seen.insert(trade.wallet.as_str()) {
                recent_wallets.push(trade.wallet.as_str());
            }
        }

        if !recent_wallets.is_empty() {
            let recent_new = recent_wallets
                .iter()
                .filter(|wallet| {
                    first_seen
                        .get(**wallet)
                        .map(|first| hours_between(*first, now) < threshold_hours)
                        .unwrap_or(false)
                })
                .count();
            let recent_fraction = recent_new as f64 / recent_wallets.len() as f64;

            if recent_fraction > self.config.surge_fraction_threshold
                && recent_wallets.len() >= self.config.surge_min_wallets
            {
                evidence.push(RiskEvidence::new(
                    RiskDetector::WalletAge,
                    Severity::Critical,
                    format!(
                        "Fresh wallet surge detected: {}/{} of the last buyers are younger than {}h (fraction={:.2}).",
                        recent_new,
                        recent_wallets.len(),
                        threshold_hours,
                        recent_fraction
                    ),
                ));
                wallet_age_risk = wallet_age_risk.max(recent_fraction).min(1.0);
            }
        }

        AgeSignal {
            wallet_age_risk,
            unique_wallets,
            new_wallets,
            evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fresh_trade(wallet: &str, now: DateTime<Utc>, hours_ago: i64) -> TradeEvent {
        TradeEvent::new(wallet, now - Duration::hours(hours_ago))
    }

    #[test]
    fn test_all_fresh_wallets_max_risk() {
        let now = Utc::now();
        let trades: Vec<TradeEvent> = (0..6)
            .map(|i| fresh_trade(&format!("w{}", i), now, 1))
            .collect();
        let analyzer = WalletAgeAnalyzer::new(EngineConfig::default());
        let signal = analyzer.analyze(&trades, now);
        assert_eq!(signal.unique_wallets, 6);
        assert_eq!(signal.new_wallets, 6);
        assert_eq!(signal.wallet_age_risk, 1.0);
        assert!(!signal.evidence.is_empty());
    }

    #[test]
    fn test_old_wallets_no_risk() {
        let now = Utc::now();
        let trades: Vec<TradeEvent> = (0..6)
            .map(|i| fresh_trade(&format!("w{}", i), now, 72))
            .collect();
        let analyzer = WalletAgeAnalyzer::new(EngineConfig::default());
        let signal = analyzer.analyze(&trades, now);
        assert_eq!(signal.new_wallets, 0);
        assert_eq!(signal.wallet_age_risk, 0.0);
        assert!(signal.evidence.is_empty());
    }

    #[test]
    fn test_first_seen_uses_earliest_timestamp() {
        let now = Utc::now();
        // Same wallet trades 48h ago and again 1h ago: first seen is 48h ago,
        // so it does not count as fresh.
        let trades = vec![
            fresh_trade("w0", now, 48),
            fresh_trade("w0", now, 1),
        ];
        let analyzer = WalletAgeAnalyzer::new(EngineConfig::default());
        let signal = analyzer.analyze(&trades, now);
        assert_eq!(signal.unique_wallets, 1);
        assert_eq!(signal.new_wallets, 0);
    }

    #[test]
    fn test_surge_requires_minimum_distinct_wallets() {
        let now = Utc::now();
        // Only 5 distinct fresh wallets: surge needs 10, so only the
        // concentration reason fires.
        let trades: Vec<TradeEvent> = (0..5)
            .map(|i| fresh_trade(&format!("w{}", i), now, 1))
            .collect();
        let analyzer = WalletAgeAnalyzer::new(EngineConfig::default());
        let signal = analyzer.analyze(&trades, now);
        assert_eq!(signal.evidence.len(), 1);
        assert!(signal.evidence[0].message.contains("New wallet concentration"));
    }

    #[test]
    fn test_surge_fires_and_raises_risk() {
        let now = Utc::now();
        let mut trades: Vec<TradeEvent> = (0..12)
            .map(|i| fresh_trade(&format!("fresh{}", i), now, 1))
            .collect();
        trades.sort_by_key(|t| t.timestamp);
        let analyzer = WalletAgeAnalyzer::new(EngineConfig::default());
        let signal = analyzer.analyze(&trades, now);
        assert!(signal
            .evidence
            .iter()
            .any(|e| e.message.contains("Fresh wallet surge")));
        assert_eq!(signal.wallet_age_risk, 1.0);
    }
}

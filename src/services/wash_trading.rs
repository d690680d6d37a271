use std::collections::HashMap;

use crate::models::{EngineConfig, RiskDetector, RiskEvidence, Severity, TradeEvent};

/// Result of the trade-count concentration analysis.
#[derive(Debug, Clone)]
pub struct WashSignal {
    pub flagged: bool,
    /// Share of all trades attributed to the top wallets, [0,1].
    pub wash_fraction: f64,
    /// The top wallets and their trade counts, highest first.
    pub top_wallets: Vec<(String, usize)>,
    pub evidence: Option<RiskEvidence>,
}

impl WashSignal {
    /// Binary risk contribution in {0,1}.
    pub fn risk(&self) -> f64 {
        if self.flagged {
            1.0
        } else {
            0.0
        }
    }
}

/// Detects wash trading: the same few wallets repeatedly dominating flows.
///
/// Wallets are ranked by trade count. Ties break by first-seen order in the
/// supplied sequence: the sort is stable over a list built in encounter
/// order, so the earlier-observed wallet wins. This tie-break is part of the
/// detector's contract.
pub struct WashTradingDetector {
    config: EngineConfig,
}

impl WashTradingDetector {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, trades: &[TradeEvent]) -> WashSignal {
        let total = trades.len();
        if total == 0 {
            return WashSignal {
                flagged: false,
                wash_fraction: 0.0,
                top_wallets: Vec::new(),
                evidence: None,
            };
        }

        // Counts accumulated in first-seen order so the stable sort below
        // keeps the documented tie-break.
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();
        for trade in trades {
            match index.get(trade.wallet.as_str()) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(trade.wallet.as_str(), counts.len());
                    counts.push((trade.wallet.clone(), 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(self.config.wash_top_wallets);

        let top_trades: usize = counts.iter().map(|(_, c)| c).sum();
        let wash_fraction = top_trades as f64 / total as f64;

        let flagged = wash_fraction >= self.config.wash_fraction_threshold
            && counts
                .iter()
                .all(|(_, c)| *c >= self.config.wash_min_trades_per_wallet);

        let evidence = flagged.then(|| {
            let cluster_desc = counts
                .iter()
                .map(|(wallet, count)| format!("{}({})", wallet, count))
                .collect::<Vec<_>>()
                .join(", ");
            RiskEvidence::new(
                RiskDetector::WashTrading,
                Severity::Critical,
                format!(
                    "Wash-trading pattern detected: top {} wallets account for {:.2} of recent trades ({}), indicating the token is circulating within a tight cluster.",
                    counts.len(),
                    wash_fraction,
                    cluster_desc
                ),
            )
        });

        WashSignal {
            flagged,
            wash_fraction,
            top_wallets: counts,
            evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn trades_for(wallets: &[&str]) -> Vec<TradeEvent> {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        wallets
            .iter()
            .enumerate()
            .map(|(i, w)| TradeEvent::new(*w, base + Duration::seconds(i as i64)))
            .collect()
    }

    #[test]
    fn test_concentrated_cluster_fires() {
        // A:4, B:3, C:2, D:1 -> top-3 sum 9/10 = 0.9, each >= 2.
        let trades = trades_for(&["a", "a", "a", "a", "b", "b", "b", "c", "c", "d"]);
        let detector = WashTradingDetector::new(EngineConfig::default());
        let signal = detector.detect(&trades);
        assert!(signal.flagged);
        assert!((signal.wash_fraction - 0.9).abs() < 1e-9);
        assert_eq!(signal.top_wallets.len(), 3);
        let message = &signal.evidence.as_ref().unwrap().message;
        assert!(message.contains("a(4)"));
        assert!(message.contains("b(3)"));
        assert!(message.contains("c(2)"));
    }

    #[test]
    fn test_singleton_top_wallet_blocks_flag() {
        // Top-3 share is high but one top wallet has a single trade.
        let trades = trades_for(&["a", "a", "a", "b", "b", "c"]);
        let detector = WashTradingDetector::new(EngineConfig::default());
        let signal = detector.detect(&trades);
        assert!(!signal.flagged);
        assert!(signal.evidence.is_none());
    }

    #[test]
    fn test_diverse_flow_does_not_fire() {
        let trades = trades_for(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let detector = WashTradingDetector::new(EngineConfig::default());
        let signal = detector.detect(&trades);
        assert!(!signal.flagged);
        assert!((signal.wash_fraction - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_is_first_seen_order() {
        // b and c both trade twice; a trades twice but is seen first.
        let trades = trades_for(&["a", "b", "c", "a", "b", "c", "d"]);
        let detector = WashTradingDetector::new(EngineConfig::default());
        let signal = detector.detect(&trades);
        let names: Vec<&str> = signal.top_wallets.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input_is_neutral() {
        let detector = WashTradingDetector::new(EngineConfig::default());
        let signal = detector.detect(&[]);
        assert!(!signal.flagged);
        assert_eq!(signal.wash_fraction, 0.0);
        assert!(signal.top_wallets.is_empty());
    }
}

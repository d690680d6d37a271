use serde::{Deserialize, Serialize};

/// Tunables of the manipulation-risk engine.
///
/// Immutable once constructed; the engine holds a copy and never reads the
/// environment or a clock. Defaults reproduce the production constants and
/// are tuned for small samples (~10 analyzed trades).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    // Temporal clustering
    pub cluster_window_seconds: i64,

    // Wallet age
    pub fresh_wallet_threshold_hours: f64,
    pub surge_sample_size: usize,
    pub surge_min_wallets: usize,
    pub surge_fraction_threshold: f64,
    pub wallet_age_reason_threshold: f64,

    // Volume / diversity
    pub diversity_window_minutes: i64,
    pub diversity_min_trades: usize,
    pub diversity_max_wallets: usize,

    // Wash trading
    pub wash_top_wallets: usize,
    pub wash_fraction_threshold: f64,
    pub wash_min_trades_per_wallet: usize,

    // Aggregation weights (maximum combined contribution: 50 points)
    pub wallet_age_weight: f64,
    pub diversity_weight: f64,
    pub liquidity_weight: f64,
    pub wash_trading_weight: f64,

    // Bonuses and floors
    pub top_holder_share_threshold_pct: f64,
    pub top_holder_bonus: f64,
    pub no_data_base_score: f64,
    pub high_risk_floor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster_window_seconds: 2,

            fresh_wallet_threshold_hours: 24.0,
            surge_sample_size: 50,
            surge_min_wallets: 10,
            surge_fraction_threshold: 0.5,
            wallet_age_reason_threshold: 0.5,

            diversity_window_minutes: 5,
            diversity_min_trades: 8,
            diversity_max_wallets: 10,

            wash_top_wallets: 3,
            wash_fraction_threshold: 0.6,
            wash_min_trades_per_wallet: 2,

            wallet_age_weight: 10.0,
            diversity_weight: 20.0,
            liquidity_weight: 10.0,
            wash_trading_weight: 10.0,

            top_holder_share_threshold_pct: 30.0,
            top_holder_bonus: 10.0,
            no_data_base_score: 50.0,
            high_risk_floor: 85.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_cap_at_fifty() {
        let config = EngineConfig::default();
        let max_modifier = config.wallet_age_weight
            + config.diversity_weight
            + config.liquidity_weight
            + config.wash_trading_weight;
        assert_eq!(max_modifier, 50.0);
    }
}

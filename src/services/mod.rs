pub mod temporal_cluster;
pub mod wallet_age;
pub mod volume_diversity;
pub mod wash_trading;
pub mod score_aggregator;
pub mod manipulation_engine;
pub mod providers;
pub mod blockchain_service;
pub mod trust_score;

pub use temporal_cluster::{ClusterSignal, TemporalClusterDetector};
pub use wallet_age::{AgeSignal, WalletAgeAnalyzer};
pub use volume_diversity::{DiversitySignal, VolumeDiversityChecker};
pub use wash_trading::{WashSignal, WashTradingDetector};
pub use score_aggregator::{DetectorSignals, ScoreAggregator};
pub use manipulation_engine::ManipulationEngine;
pub use providers::{TokenFactsProvider, TradeHistoryProvider};
pub use blockchain_service::SolanaRpcClient;

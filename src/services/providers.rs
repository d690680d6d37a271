use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{TokenFacts, TradeEvent};

/// Supplies recent trade history for a token. Implementations are expected
/// to return an empty sequence on any upstream failure; the engine treats
/// empty identically to "no trades".
#[async_trait]
pub trait TradeHistoryProvider: Send + Sync {
    async fn fetch_trade_history(
        &self,
        token_address: &str,
        limit: usize,
    ) -> Result<Vec<TradeEvent>, AppError>;
}

/// Supplies pre-fetched on-chain facts for a token. Absence is a first-class,
/// expected case; the engine degrades to neutral defaults.
#[async_trait]
pub trait TokenFactsProvider: Send + Sync {
    async fn fetch_token_facts(&self, token_address: &str)
        -> Result<Option<TokenFacts>, AppError>;
}

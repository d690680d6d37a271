use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single observed trade of the analyzed token.
///
/// Wallet identifiers are opaque strings compared only for equality. Input
/// ordering is not guaranteed; the engine sorts by timestamp before any
/// windowed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEvent {
    pub wallet: String,
    pub timestamp: DateTime<Utc>,
    pub amount: Option<f64>,
}

impl TradeEvent {
    pub fn new(wallet: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            wallet: wallet.into(),
            timestamp,
            amount: None,
        }
    }

    /// Boundary check for collaborators normalizing upstream data. Events
    /// with an empty wallet identifier are a contract violation and must be
    /// rejected before they reach the engine.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.wallet.is_empty() {
            return Err(AppError::ValidationError(
                "trade event has an empty wallet identifier".to_string(),
            ));
        }
        Ok(())
    }
}

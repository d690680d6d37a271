use serde::{Deserialize, Serialize};
use std::env;

use crate::models::EngineConfig;

/// Process-level settings for the collaborators and the binary. The engine
/// itself takes an `EngineConfig` at construction and never reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub rpc: RpcSettings,
    pub liquidity: LiquiditySettings,
    pub risk: RiskSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcSettings {
    pub solana_rpc_url: String,
    pub request_timeout_seconds: u64,
}

/// Token-specific liquidity lock configuration. The LP mint is optional;
/// without it the liquidity check is skipped and reported as such.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquiditySettings {
    pub lp_mint_address: Option<String>,
    pub locker_addresses: Vec<String>,
    pub burn_addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSettings {
    pub high_risk_threshold: f64,
    pub max_transactions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rpc: RpcSettings::default(),
            liquidity: LiquiditySettings::default(),
            risk: RiskSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for RpcSettings {
    fn default() -> Self {
        RpcSettings {
            solana_rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

impl Default for LiquiditySettings {
    fn default() -> Self {
        LiquiditySettings {
            lp_mint_address: None,
            locker_addresses: Vec::new(),
            // The system program address doubles as the canonical burn target.
            burn_addresses: vec!["11111111111111111111111111111111".to_string()],
        }
    }
}

impl Default for RiskSettings {
    fn default() -> Self {
        RiskSettings {
            high_risk_threshold: 70.0,
            max_transactions: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let _settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Ok(Settings {
            rpc: RpcSettings {
                solana_rpc_url: env::var("SOLANA_RPC_URL")
                    .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string()),
                request_timeout_seconds: env::var("RPC_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .unwrap_or(15),
            },
            liquidity: LiquiditySettings {
                lp_mint_address: env::var("LP_MINT_ADDRESS").ok().filter(|s| !s.is_empty()),
                locker_addresses: env::var("LIQUIDITY_LOCKER_ADDRESSES")
                    .map(|raw| {
                        raw.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
                burn_addresses: LiquiditySettings::default().burn_addresses,
            },
            risk: RiskSettings {
                high_risk_threshold: env::var("HIGH_RISK_THRESHOLD")
                    .unwrap_or_else(|_| "70.0".to_string())
                    .parse()
                    .unwrap_or(70.0),
                max_transactions: env::var("MAX_TRANSACTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            logging: LoggingSettings {
                level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        })
    }

    /// Materializes the engine tunables handed to `ManipulationEngine`.
    ///
    /// Production defaults overlaid with any `ENGINE_*` environment
    /// overrides (e.g. `ENGINE_HIGH_RISK_FLOOR=90`). An unparseable
    /// override set falls back to the defaults wholesale.
    pub fn engine_config(&self) -> EngineConfig {
        config::Config::builder()
            .add_source(config::Config::try_from(&EngineConfig::default()).unwrap_or_default())
            .add_source(config::Environment::with_prefix("ENGINE").try_parsing(true))
            .build()
            .and_then(|merged| merged.try_deserialize())
            .unwrap_or_default()
    }
}

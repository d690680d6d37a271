use async_trait::async_trait;
use base64::Engine as _;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::config::Settings;
use crate::error::AppError;
use crate::models::{RiskDetector, RiskEvidence, Severity, TokenFacts, TradeEvent};
use crate::services::providers::{TokenFactsProvider, TradeHistoryProvider};
use crate::utils::time::from_unix_timestamp;

// SPL Token mint account layout: COption<Pubkey> mint_authority (4 + 32),
// u64 supply, u8 decimals, u8 is_initialized, COption<Pubkey> freeze
// authority (4 + 32).
const MINT_ACCOUNT_LEN: usize = 82;
const MINT_AUTHORITY_TAG_OFFSET: usize = 0;
const FREEZE_AUTHORITY_TAG_OFFSET: usize = 46;

/// Solana JSON-RPC collaborator supplying trade history and token facts.
///
/// All retrieval and normalization happens here, before the engine runs.
/// Every sub-check degrades to its neutral default with an explanatory
/// evidence entry instead of failing the analysis.
pub struct SolanaRpcClient {
    http: reqwest::Client,
    rpc_url: Url,
    lp_mint_address: Option<String>,
    lock_destinations: HashSet<String>,
}

impl SolanaRpcClient {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let rpc_url = settings
            .rpc
            .solana_rpc_url
            .parse::<Url>()
            .map_err(|e| AppError::ConfigError(format!("Invalid Solana RPC URL: {}", e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.rpc.request_timeout_seconds))
            .build()?;

        let mut lock_destinations: HashSet<String> =
            settings.liquidity.burn_addresses.iter().cloned().collect();
        lock_destinations.extend(settings.liquidity.locker_addresses.iter().cloned());

        Ok(Self {
            http,
            rpc_url,
            lp_mint_address: settings.liquidity.lp_mint_address.clone(),
            lock_destinations,
        })
    }

    async fn rpc_call(&self, method: &str, params: Value) -> Result<Value, AppError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .http
            .post(self.rpc_url.clone())
            .json(&payload)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| AppError::BlockchainError(format!("RPC {} failed: {}", method, e)))?;
        let body: Value = response.json().await?;
        if let Some(err) = body.get("error") {
            return Err(AppError::BlockchainError(format!(
                "RPC {} returned error: {}",
                method, err
            )));
        }
        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Recent transactions touching the mint, approximated as "recent buyers"
    /// by taking the first signer of each transaction. Upstream failure maps
    /// to an empty history, which the engine scores as "no trades".
    async fn recent_trades(&self, token_address: &str, limit: usize) -> Vec<TradeEvent> {
        // Over-fetch signatures for dedup headroom.
        let signatures = match self
            .rpc_call(
                "getSignaturesForAddress",
                json!([token_address, { "limit": (limit * 3).max(limit) }]),
            )
            .await
        {
            Ok(Value::Array(sigs)) => sigs,
            Ok(_) => Vec::new(),
            Err(e) => {
                warn!("signature fetch failed for {}: {}", token_address, e);
                return Vec::new();
            }
        };

        let mut trades = Vec::new();
        for sig_info in signatures {
            if trades.len() >= limit {
                break;
            }
            let signature = sig_info.get("signature").and_then(Value::as_str);
            let block_time = sig_info.get("blockTime").and_then(Value::as_i64);
            let (Some(signature), Some(block_time)) = (signature, block_time) else {
                continue;
            };
            let Some(timestamp) = from_unix_timestamp(block_time) else {
                continue;
            };

            let tx = match self
                .rpc_call(
                    "getTransaction",
                    json!([signature, { "encoding": "jsonParsed", "commitment": "confirmed" }]),
                )
                .await
            {
                Ok(tx) if !tx.is_null() => tx,
                Ok(_) => continue,
                Err(e) => {
                    warn!("transaction fetch failed for {}: {}", signature, e);
                    continue;
                }
            };

            let account_keys = tx
                .pointer("/transaction/message/accountKeys")
                .and_then(Value::as_array);
            let payer = account_keys.and_then(|keys| {
                keys.iter().find_map(|key| match key {
                    Value::Object(parsed) => parsed
                        .get("signer")
                        .and_then(Value::as_bool)
                        .unwrap_or(false)
                        .then(|| parsed.get("pubkey").and_then(Value::as_str))
                        .flatten(),
                    Value::String(raw) => Some(raw.as_str()),
                    _ => None,
                })
            });
            let Some(payer) = payer else { continue };

            let event = TradeEvent::new(payer, timestamp);
            if event.validate().is_ok() {
                trades.push(event);
            }
        }

        info!(
            "collected {} trade events for {}",
            trades.len(),
            token_address
        );
        trades
    }

    /// Mint and freeze authority status from the SPL mint account data.
    async fn check_token_authorities(&self, token_address: &str) -> (bool, bool, Vec<RiskEvidence>) {
        let mut evidence = Vec::new();

        let result = match self
            .rpc_call("getAccountInfo", json!([token_address, { "encoding": "base64" }]))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                evidence.push(RiskEvidence::new(
                    RiskDetector::TokenAuthority,
                    Severity::Info,
                    format!("Authority check: data unavailable (RPC error: {}).", e),
                ));
                return (false, false, evidence);
            }
        };

        let data_b64 = result
            .pointer("/value/data/0")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if data_b64.is_empty() {
            evidence.push(RiskEvidence::new(
                RiskDetector::TokenAuthority,
                Severity::Info,
                "Authority check: data unavailable (no account data returned for this mint).",
            ));
            return (false, false, evidence);
        }

        let raw = match base64::engine::general_purpose::STANDARD.decode(data_b64) {
            Ok(raw) if raw.len() >= MINT_ACCOUNT_LEN => raw,
            Ok(_) => {
                evidence.push(RiskEvidence::new(
                    RiskDetector::TokenAuthority,
                    Severity::Info,
                    "Authority check: data unavailable (mint account data truncated).",
                ));
                return (false, false, evidence);
            }
            Err(e) => {
                evidence.push(RiskEvidence::new(
                    RiskDetector::TokenAuthority,
                    Severity::Info,
                    format!("Authority check: data unavailable (failed to decode mint data: {}).", e),
                ));
                return (false, false, evidence);
            }
        };

        let mint_present = read_coption_tag(&raw, MINT_AUTHORITY_TAG_OFFSET) != 0;
        let freeze_present = read_coption_tag(&raw, FREEZE_AUTHORITY_TAG_OFFSET) != 0;

        if freeze_present {
            evidence.push(RiskEvidence::new(
                RiskDetector::TokenAuthority,
                Severity::Warning,
                "Authority risk: token has an active freeze authority on-chain, allowing holder accounts to be frozen.",
            ));
        }
        if mint_present {
            evidence.push(RiskEvidence::new(
                RiskDetector::TokenAuthority,
                Severity::Warning,
                "Authority risk: token has an active mint authority on-chain, enabling additional supply to be minted.",
            ));
        }
        if !freeze_present && !mint_present {
            evidence.push(RiskEvidence::new(
                RiskDetector::TokenAuthority,
                Severity::Info,
                "Authority check: both mint and freeze authority appear to be renounced.",
            ));
        }

        (freeze_present, mint_present, evidence)
    }

    /// Top-10 holder share of verified total supply, in percent.
    async fn check_top_holders(&self, token_address: &str) -> (f64, Vec<RiskEvidence>) {
        let mut evidence = Vec::new();

        let total_amount = match self.rpc_call("getTokenSupply", json!([token_address])).await {
            Ok(result) => result
                .pointer("/value/amount")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<u128>().ok())
                .unwrap_or(0),
            Err(e) => {
                evidence.push(RiskEvidence::new(
                    RiskDetector::TopHolders,
                    Severity::Info,
                    format!("Top-holder analysis: data unavailable (getTokenSupply RPC error: {}).", e),
                ));
                return (0.0, evidence);
            }
        };
        if total_amount == 0 {
            evidence.push(RiskEvidence::new(
                RiskDetector::TopHolders,
                Severity::Info,
                "Top-holder analysis: data unavailable (total supply reported as zero).",
            ));
            return (0.0, evidence);
        }

        let accounts = match self
            .rpc_call(
                "getTokenLargestAccounts",
                json!([token_address, { "commitment": "confirmed" }]),
            )
            .await
        {
            Ok(result) => result
                .get("value")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                evidence.push(RiskEvidence::new(
                    RiskDetector::TopHolders,
                    Severity::Info,
                    format!(
                        "Top-holder analysis: data unavailable (getTokenLargestAccounts RPC error: {}).",
                        e
                    ),
                ));
                return (0.0, evidence);
            }
        };

        let holders: Vec<(String, f64)> = accounts
            .iter()
            .take(10)
            .filter_map(|acc| {
                let address = acc.get("address").and_then(Value::as_str)?;
                let amount = acc
                    .get("amount")
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse::<u128>().ok())?;
                let pct = amount as f64 / total_amount as f64 * 100.0;
                Some((address.to_string(), pct))
            })
            .collect();

        if holders.is_empty() {
            evidence.push(RiskEvidence::new(
                RiskDetector::TopHolders,
                Severity::Info,
                "Top-holder analysis: data unavailable (no largest accounts returned).",
            ));
            return (0.0, evidence);
        }

        let top_10_share: f64 = holders.iter().map(|(_, pct)| pct).sum();

        // A single wallet above 10% is a whale concentration warning.
        if let Some((address, pct)) = holders
            .iter()
            .filter(|(_, pct)| *pct > 10.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
        {
            evidence.push(RiskEvidence::new(
                RiskDetector::TopHolders,
                Severity::Warning,
                format!(
                    "Whale concentration risk: wallet '{}' controls {:.2}% of total supply.",
                    address, pct
                ),
            ));
        }

        if top_10_share > 30.0 {
            evidence.push(RiskEvidence::new(
                RiskDetector::TopHolders,
                Severity::Warning,
                format!(
                    "Top-holder concentration: top 10 holders collectively own {:.2}% of the verified total supply.",
                    top_10_share
                ),
            ));
        }

        (top_10_share, evidence)
    }

    /// Liquidity lock risk from the LP mint's largest accounts. Locked or
    /// burned LP supply reads as 0.0; withdrawable reads as 1.0; no data
    /// reads as 0.5.
    async fn check_liquidity_lock(&self) -> (f64, Vec<RiskEvidence>) {
        let mut evidence = Vec::new();

        let Some(lp_mint) = &self.lp_mint_address else {
            evidence.push(RiskEvidence::new(
                RiskDetector::Liquidity,
                Severity::Info,
                "Liquidity lock check skipped: no LP mint address is configured for this token.",
            ));
            return (0.0, evidence);
        };

        let accounts = match self
            .rpc_call(
                "getTokenLargestAccounts",
                json!([lp_mint, { "commitment": "confirmed" }]),
            )
            .await
        {
            Ok(result) => result
                .get("value")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                evidence.push(RiskEvidence::new(
                    RiskDetector::Liquidity,
                    Severity::Info,
                    format!("Liquidity lock check: data unavailable (RPC error: {}).", e),
                ));
                return (0.5, evidence);
            }
        };

        if accounts.is_empty() {
            evidence.push(RiskEvidence::new(
                RiskDetector::Liquidity,
                Severity::Info,
                "Liquidity lock check: data unavailable (no largest accounts returned for LP mint).",
            ));
            return (0.5, evidence);
        }

        let locked = accounts.iter().any(|acc| {
            acc.get("address")
                .and_then(Value::as_str)
                .map(|addr| self.lock_destinations.contains(addr))
                .unwrap_or(false)
        });

        if locked {
            evidence.push(RiskEvidence::new(
                RiskDetector::Liquidity,
                Severity::Info,
                "Liquidity guard: LP token largest accounts include known burn/locker targets; liquidity appears locked or burned.",
            ));
            (0.0, evidence)
        } else {
            evidence.push(RiskEvidence::new(
                RiskDetector::Liquidity,
                Severity::Critical,
                "Unlocked liquidity risk: LP tokens are not concentrated in known burn/locker addresses, indicating withdrawable liquidity.",
            ));
            (1.0, evidence)
        }
    }
}

fn read_coption_tag(raw: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([raw[offset], raw[offset + 1], raw[offset + 2], raw[offset + 3]])
}

#[async_trait]
impl TradeHistoryProvider for SolanaRpcClient {
    async fn fetch_trade_history(
        &self,
        token_address: &str,
        limit: usize,
    ) -> Result<Vec<TradeEvent>, AppError> {
        Ok(self.recent_trades(token_address, limit).await)
    }
}

#[async_trait]
impl TokenFactsProvider for SolanaRpcClient {
    async fn fetch_token_facts(
        &self,
        token_address: &str,
    ) -> Result<Option<TokenFacts>, AppError> {
        let (freeze_authority_present, mint_authority_present, mut evidence) =
            self.check_token_authorities(token_address).await;

        let (top_10_holder_share_pct, holder_evidence) =
            self.check_top_holders(token_address).await;
        evidence.extend(holder_evidence);

        let (liquidity_lock_risk, liquidity_evidence) = self.check_liquidity_lock().await;
        evidence.extend(liquidity_evidence);

        Ok(Some(TokenFacts {
            freeze_authority_present,
            mint_authority_present,
            top_10_holder_share_pct,
            liquidity_lock_risk,
            evidence,
        }))
    }
}

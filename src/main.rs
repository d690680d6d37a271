use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use token_risk_monitor::{
    config::Settings,
    services::{
        trust_score::derive_trust_score, ManipulationEngine, SolanaRpcClient, TokenFactsProvider,
        TradeHistoryProvider,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let token_address = match std::env::args().nth(1) {
        Some(addr) if !addr.is_empty() => addr,
        _ => {
            eprintln!("Usage: token-risk-monitor <mint-address>");
            std::process::exit(2);
        }
    };

    info!("Analyzing token {}", token_address);

    let client = SolanaRpcClient::new(&settings)?;
    let trades = client
        .fetch_trade_history(&token_address, settings.risk.max_transactions)
        .await?;
    let facts = client.fetch_token_facts(&token_address).await?;

    let engine = ManipulationEngine::new(settings.engine_config());
    let assessment = engine.analyze(&trades, facts.as_ref(), Utc::now());
    let trust_score = derive_trust_score(&assessment);

    if assessment.manipulation_score >= settings.risk.high_risk_threshold {
        warn!(
            token = %token_address,
            score = assessment.manipulation_score,
            "HIGH RISK DETECTION"
        );
    }

    let report = json!({
        "token_address": token_address,
        "manipulation_score": assessment.manipulation_score,
        "trust_score": trust_score,
        "freeze_authority_present": assessment.freeze_authority_present,
        "mint_authority_present": assessment.mint_authority_present,
        "top_holders_share": assessment.top_10_holder_share_pct,
        "analyzed_transactions": trades.len(),
        "timestamp_utc": Utc::now(),
        "reasons": assessment.reasons,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

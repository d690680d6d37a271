use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use token_risk_monitor::models::{TokenFacts, TradeEvent};
use token_risk_monitor::services::ManipulationEngine;

fn reference_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Arbitrary trade sets: up to 40 trades from a small wallet pool, spread
/// over the last ~55 hours so both fresh and aged wallets occur.
fn trade_set() -> impl Strategy<Value = Vec<TradeEvent>> {
    prop::collection::vec((0usize..8, 0i64..200_000), 0..40).prop_map(|specs| {
        let base = reference_now() - Duration::seconds(200_000);
        specs
            .into_iter()
            .map(|(wallet, offset)| {
                TradeEvent::new(format!("wallet_{}", wallet), base + Duration::seconds(offset))
            })
            .collect()
    })
}

fn facts_strategy() -> impl Strategy<Value = Option<TokenFacts>> {
    prop_oneof![
        Just(None),
        (any::<bool>(), any::<bool>(), 0.0f64..100.0, 0.0f64..=1.0).prop_map(
            |(freeze, mint, share, lock)| {
                Some(TokenFacts {
                    freeze_authority_present: freeze,
                    mint_authority_present: mint,
                    top_10_holder_share_pct: share,
                    liquidity_lock_risk: lock,
                    evidence: Vec::new(),
                })
            }
        ),
    ]
}

proptest! {
    #[test]
    fn score_is_always_clamped(trades in trade_set(), facts in facts_strategy()) {
        let engine = ManipulationEngine::default();
        let assessment = engine.analyze(&trades, facts.as_ref(), reference_now());
        prop_assert!(assessment.manipulation_score >= 0.0);
        prop_assert!(assessment.manipulation_score <= 100.0);
    }

    #[test]
    fn reasons_are_never_empty(trades in trade_set(), facts in facts_strategy()) {
        let engine = ManipulationEngine::default();
        let assessment = engine.analyze(&trades, facts.as_ref(), reference_now());
        prop_assert!(!assessment.reasons.is_empty());
    }

    #[test]
    fn permuting_input_preserves_the_score(trades in trade_set(), facts in facts_strategy()) {
        let engine = ManipulationEngine::default();
        let forward = engine.analyze(&trades, facts.as_ref(), reference_now());
        let mut reversed = trades.clone();
        reversed.reverse();
        let backward = engine.analyze(&reversed, facts.as_ref(), reference_now());
        prop_assert_eq!(forward.manipulation_score, backward.manipulation_score);
    }

    #[test]
    fn repeated_invocation_is_idempotent(trades in trade_set(), facts in facts_strategy()) {
        let engine = ManipulationEngine::default();
        let first = engine.analyze(&trades, facts.as_ref(), reference_now());
        let second = engine.analyze(&trades, facts.as_ref(), reference_now());
        prop_assert_eq!(first.manipulation_score, second.manipulation_score);
        prop_assert_eq!(first.reason_messages(), second.reason_messages());
    }

    #[test]
    fn zero_trades_always_hit_the_floor(facts in facts_strategy()) {
        let engine = ManipulationEngine::default();
        let assessment = engine.analyze(&[], facts.as_ref(), reference_now());
        prop_assert!(assessment.manipulation_score >= 85.0);
    }
}

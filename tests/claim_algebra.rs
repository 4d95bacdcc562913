//! Claim Algebra Tests
//!
//! Covers:
//! - `Zero` is the identity of `and`
//! - `and` and `or` flatten nested nodes of their own kind, preserving order
//! - `map_params` preserves shape and retargets every parameter type
//! - Structural equality survives a JSON round trip

use chrono::{DateTime, NaiveDate, Utc};
use contingent::claim::{Claim, ClaimErrorCode, Electable};
use contingent::lifecycle::{lifecycle, LifecycleEvent, Pending};
use contingent::observation::{FixingTable, Inequality, Observation};
use rust_decimal::Decimal;

type C = Claim<NaiveDate, Decimal, String, String>;

// =============================================================================
// Test Utilities
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn one(asset: &str) -> C {
    C::one(asset.to_string())
}

fn quantities<T>(pending: &[Pending<T, Decimal, String>]) -> Vec<(String, Decimal)> {
    pending.iter().map(|p| (p.asset.clone(), p.amount)).collect()
}

fn coupon(on: NaiveDate, rate: Decimal) -> C {
    C::when(Inequality::at_or_after(on), C::scale(Observation::constant(rate), one("USD")))
}

// =============================================================================
// Conjunction
// =============================================================================

#[test]
fn test_zero_is_and_identity() {
    let c = coupon(date(2025, 1, 1), Decimal::new(5, 2));
    assert_eq!(C::and(C::zero(), c.clone()), c);
    assert_eq!(C::and(c.clone(), C::zero()), c);
    assert_eq!(C::and(C::zero(), C::zero()), C::zero());
}

#[test]
fn test_and_is_flat_and_ordered() {
    let (a, b, c) = (one("USD"), one("EUR"), one("GBP"));
    let left = C::and(C::and(a.clone(), b.clone()), c.clone());
    let right = C::and(a.clone(), C::and(b.clone(), c.clone()));
    assert_eq!(left, right);
    assert_eq!(left, C::And(vec![a, b, c]));
}

#[test]
fn test_collect_builds_conjunction() {
    let coupons: C = (1..=4)
        .map(|m| coupon(date(2025, m * 3, 1), Decimal::new(125, 3)))
        .collect();
    match &coupons {
        Claim::And(children) => assert_eq!(children.len(), 4),
        other => panic!("unexpected {:?}", other),
    }
}

// =============================================================================
// Choice
// =============================================================================

#[test]
fn test_or_flattens_nested_choice() {
    let nested = C::or(
        Electable::new("INNER", C::or(Electable::new("A", one("USD")), Electable::new("B", one("EUR")))),
        Electable::new("C", one("GBP")),
    );
    assert_eq!(nested.election_tags(), vec!["A", "B", "C"]);

    let flat = C::or_all(vec![
        Electable::new("A", one("USD")),
        Electable::new("B", one("EUR")),
        Electable::new("C", one("GBP")),
    ])
    .unwrap();
    assert_eq!(nested, flat);
}

#[test]
fn test_or_all_needs_two_choices() {
    let err = C::or_all(vec![Electable::new("ONLY", one("USD"))]).unwrap_err();
    assert_eq!(err.code(), ClaimErrorCode::CtgConstructionInvalid);
    assert!(C::or_all(Vec::new()).is_err());
}

// =============================================================================
// Parameter Mapping
// =============================================================================

#[test]
fn test_map_params_retargets_time_type() {
    let bond = C::and_all(vec![
        coupon(date(2025, 6, 30), Decimal::new(25, 1)),
        coupon(date(2025, 12, 31), Decimal::new(25, 1)),
        C::when(Inequality::at_or_after(date(2025, 12, 31)), C::scale(Observation::constant(Decimal::new(100, 0)), one("USD"))),
    ]);

    let to_utc = |d: NaiveDate| -> DateTime<Utc> { d.and_hms_opt(0, 0, 0).unwrap().and_utc() };
    let retargeted: Claim<DateTime<Utc>, Decimal, String, String> =
        bond.clone().map_params(to_utc, |x| x, |a| a, |o| o);

    assert_eq!(retargeted.node_count(), bond.node_count());
    assert_eq!(retargeted.assets(), bond.assets());

    // Lifecycling both versions at equivalent times realizes the same quantities
    let oracle_dates = FixingTable::<String, NaiveDate, Decimal>::new();
    let oracle_utc = FixingTable::<String, DateTime<Utc>, Decimal>::new();
    let at = date(2025, 7, 1);

    let by_date = lifecycle(&bond, &oracle_dates, &[LifecycleEvent::at(at)]).unwrap();
    let by_utc = lifecycle(&retargeted, &oracle_utc, &[LifecycleEvent::at(to_utc(at))]).unwrap();

    assert_eq!(quantities(&by_date.pending), quantities(&by_utc.pending));
    assert_eq!(by_utc.pending[0].time, to_utc(date(2025, 6, 30)));
}

#[test]
fn test_map_params_retargets_identifiers() {
    let option = C::when(
        Inequality::at_or_after(date(2025, 3, 21)),
        C::scale(Observation::observe("ACME".to_string()), one("USD")),
    );
    let mapped = option.map_params(|t| t, |x| x, |a| format!("ccy:{}", a), |o| format!("eq:{}", o));
    match mapped {
        Claim::When(_, inner) => match *inner {
            Claim::Scale(Observation::Observe(id), leaf) => {
                assert_eq!(id, "eq:ACME");
                assert_eq!(*leaf, Claim::One("ccy:USD".to_string()));
            }
            other => panic!("unexpected {:?}", other),
        },
        other => panic!("unexpected {:?}", other),
    }
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn test_json_round_trip_preserves_equality() {
    let tree = C::and(
        C::anytime(Inequality::at_or_before(date(2026, 1, 1)), "PUT", one("USD")),
        C::until(
            Inequality::lte(Observation::observe("ACME".into()), Observation::constant(Decimal::new(40, 0))),
            C::give(one("EUR")),
        ),
    );
    let json = serde_json::to_string(&tree).unwrap();
    let back: C = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
}

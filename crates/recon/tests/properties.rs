// Property-based tests for name keys, numeric reductions and run determinism.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::json;

use fruitdex_recon::config::CatalogConfig;
use fruitdex_recon::engine::run;
use fruitdex_recon::model::{PrimaryFruit, ReconInput, SkinListing};
use fruitdex_recon::normalize::{choose_better_name, normalize_words, pick_display_name};
use fruitdex_recon::numeric::{coerce_int, mean_rounded, to_int_loose};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn config_64() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(64),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_word() -> impl Strategy<Value = String> {
    r"[A-Za-z]{1,8}"
}

/// Item display names drawn from a small pool so sources overlap.
fn arb_item_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Dragon".to_string()),
        Just("East Dragon".to_string()),
        Just("West Dragon".to_string()),
        Just("Lightning".to_string()),
        Just("Rumble".to_string()),
        Just("T-Rex".to_string()),
        Just("flame".to_string()),
        Just("Flame".to_string()),
    ]
}

fn arb_number() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        3 => (0i64..10_000_000).prop_map(|n| json!(n)),
        1 => (0i64..10_000).prop_map(|n| json!(format!("{n}"))),
        1 => Just(json!(null)),
        1 => Just(json!("n/a")),
    ]
}

fn arb_primary() -> impl Strategy<Value = PrimaryFruit> {
    (arb_item_name(), arb_number(), arb_number(), any::<bool>()).prop_map(
        |(name, reg, robux, tradeable)| {
            serde_json::from_value(json!({
                "name": name,
                "regValue": reg,
                "robuxPrice": robux,
                "tradeable": tradeable,
            }))
            .unwrap()
        },
    )
}

fn arb_listing() -> impl Strategy<Value = SkinListing> {
    (arb_word(), arb_item_name(), arb_number(), any::<bool>()).prop_map(
        |(skin, item, reg, before)| {
            let name = if before {
                format!("{skin} {item}")
            } else {
                format!("{item} {skin}")
            };
            serde_json::from_value(json!({"name": name, "regValue": reg})).unwrap()
        },
    )
}

// ---------------------------------------------------------------------------
// Name keys
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn word_order_does_not_change_key(
        (words, shuffled) in prop::collection::vec(arb_word(), 1..6)
            .prop_flat_map(|w| (Just(w.clone()), Just(w).prop_shuffle()))
    ) {
        prop_assert_eq!(
            normalize_words(&words.join(" ")),
            normalize_words(&shuffled.join(" "))
        );
    }

    #[test]
    fn separators_and_case_do_not_change_key(words in prop::collection::vec(arb_word(), 1..5)) {
        let spaced = words.join(" ");
        let dashed = words.join("-").to_uppercase();
        prop_assert_eq!(normalize_words(&spaced), normalize_words(&dashed));
    }

    #[test]
    fn better_name_is_an_input_and_never_shorter(a in r"[A-Za-z ]{0,12}", b in r"[A-Za-z ]{0,12}") {
        let chosen = choose_better_name(&a, &b);
        prop_assert!(chosen == a || chosen == b);
        prop_assert!(chosen.chars().count() >= a.chars().count().min(b.chars().count()));
        prop_assert_eq!(
            chosen.chars().count(),
            a.chars().count().max(b.chars().count())
        );
    }

    #[test]
    fn display_name_is_a_variant(variants in prop::collection::vec(r"[A-Za-z]{1,10}", 1..6)) {
        let picked = pick_display_name(&variants);
        prop_assert!(variants.contains(&picked));
    }
}

// ---------------------------------------------------------------------------
// Numeric reductions
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn mean_within_bounds(values in prop::collection::vec(-1_000_000_000i64..1_000_000_000, 1..50)) {
        let mean = mean_rounded(&values);
        let min = *values.iter().min().unwrap();
        let max = *values.iter().max().unwrap();
        prop_assert!(mean >= min && mean <= max, "mean {} outside [{}, {}]", mean, min, max);
    }

    #[test]
    fn thousands_separators_are_ignored(n in 0i64..1_000_000_000_000) {
        let plain = n.to_string();
        let mut grouped = String::new();
        for (i, c) in plain.chars().enumerate() {
            if i > 0 && (plain.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        prop_assert_eq!(to_int_loose(&json!(grouped)), n);
        prop_assert_eq!(coerce_int(&json!(plain)), Some(n));
    }

    #[test]
    fn loose_coercion_never_panics(s in ".{0,20}") {
        let _ = to_int_loose(&json!(s));
    }
}

// ---------------------------------------------------------------------------
// Whole runs
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_64())]
    #[test]
    fn runs_are_deterministic(
        primary in prop::collection::vec(arb_primary(), 0..12),
        listings in prop::collection::vec(arb_listing(), 0..12),
    ) {
        let input = ReconInput { primary, listings, ..ReconInput::default() };
        let config = CatalogConfig::default();
        let first = serde_json::to_string(&run(&config, &input).unwrap()).unwrap();
        let second = serde_json::to_string(&run(&config, &input).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn one_record_per_canonical_key(
        primary in prop::collection::vec(arb_primary(), 0..12),
        listings in prop::collection::vec(arb_listing(), 0..12),
    ) {
        let input = ReconInput { primary, listings, ..ReconInput::default() };
        let config = CatalogConfig::default();
        let aliases = config.alias_table();
        let result = run(&config, &input).unwrap();

        let mut keys = HashSet::new();
        for fruit in &result.fruits {
            prop_assert!(
                keys.insert(aliases.canonical_key(&fruit.name)),
                "duplicate bucket for {}", fruit.name
            );
            prop_assert!(fruit.name != "Dragon", "bridged item survived");
        }
    }
}

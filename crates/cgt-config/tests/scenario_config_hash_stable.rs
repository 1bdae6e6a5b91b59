//! Scenario: config hash stability
//!
//! GREEN when:
//! - `load_layered_yaml_from_strings` called twice on the same inputs returns
//!   identical config_hash.
//! - Reordering keys within YAML doesn't change the hash (canonicalization).
//! - Different values produce different hashes.
//! - Overlay layers take effect in the typed view and in the merged JSON.

use cgt_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
tax:
  exempt_threshold_cents: 2000000
  rate_numerator: 20
  rate_denominator: 100
account:
  error_streak_limit: 3
"#;

/// Same content as BASE_YAML but with keys in different order.
const BASE_YAML_REORDERED: &str = r#"
account:
  error_streak_limit: 3
tax:
  rate_denominator: 100
  rate_numerator: 20
  exempt_threshold_cents: 2000000
"#;

const OVERLAY_YAML: &str = r#"
tax:
  rate_numerator: 15
account:
  error_streak_limit: 5
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();

    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
    assert_eq!(
        original.canonical_json,
        r#"{"account":{"error_streak_limit":3},"tax":{"exempt_threshold_cents":2000000,"rate_denominator":100,"rate_numerator":20}}"#
    );
}

#[test]
fn different_values_produce_different_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_ne!(a.config_hash, b.config_hash);
}

#[test]
fn overlay_overrides_base() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();

    assert_eq!(a.config.tax.rate_numerator, 15);
    assert_eq!(a.config.tax.rate_denominator, 100);
    assert_eq!(a.config.account.error_streak_limit, 5);
    assert_eq!(
        a.config_json
            .pointer("/tax/exempt_threshold_cents")
            .and_then(|v| v.as_i64()),
        Some(2_000_000),
        "base keys not in the overlay survive the merge"
    );
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();

    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn empty_config_produces_stable_hash() {
    let a = load_layered_yaml_from_strings(&["{}"]).unwrap();
    let b = load_layered_yaml_from_strings(&[]).unwrap();
    let c = load_layered_yaml_from_strings(&[""]).unwrap();

    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.config_hash, c.config_hash);
    assert_eq!(a.canonical_json, "{}");
}

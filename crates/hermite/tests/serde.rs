//! Serialization of reports and configuration (requires the `serde` feature).

#![cfg(feature = "serde")]

use hermite::prelude::*;
use serde_json::Value;

fn cbrt2() -> Real {
    Real::from_integer(2, Precision::DEFAULT).cbrt()
}

// =============================================================================
// JSON output
// =============================================================================

#[test]
fn periodic_report_is_tagged() {
    let report = run_periodicity(&cbrt2(), &HermiteConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"]["status"], "periodic");
    assert_eq!(json["status"]["period"], 1);
    assert_eq!(json["digit_pairs"][0], serde_json::json!({ "a1": "1", "a2": "1" }));
    let v1 = json["triples"][0]["v1"].as_str().unwrap();
    assert!(v1.starts_with("1.25992104989487316476"), "{v1}");
}

#[test]
fn termination_reason_is_tagged() {
    let value = Real::from_ratio(22, 7, Precision::DEFAULT).unwrap();
    let report = run_periodicity(&value, &HermiteConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"]["status"], "terminated");
    assert_eq!(json["status"]["reason"]["kind"], "small_denominator");
    assert_eq!(json["status"]["reason"]["rational"], "22/7");
}

#[test]
fn verdict_carries_polynomial_as_strings() {
    let p = Polynomial::from_integers([1, 0, 0, -1]).unwrap();
    let verdict = verify_cubic(&Real::one(Precision::DEFAULT), Some(&p), &HermiteConfig::default())
        .unwrap();
    let json = serde_json::to_value(&verdict).unwrap();
    assert_eq!(json["classification"], "not_cubic");
    assert_eq!(json["reason"]["kind"], "reducible");
    assert_eq!(json["polynomial"], serde_json::json!(["1", "0", "0", "-1"]));
}

#[test]
fn classification_round_trips_through_text() {
    let c = classify(&cbrt2(), &HermiteConfig::default()).unwrap();
    let text = serde_json::to_string_pretty(&c).unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["kind"], "cubic_irrational");
    assert_eq!(json["confidence"], "very_high");
    assert_eq!(json["method"], "polynomial_matrix_periodicity");
    assert_eq!(json["verification"]["classification"], "cubic_irrational");
    assert_eq!(json["verification"]["evidence"]["is_root"], true);
    assert_eq!(
        json["verification"]["evidence"]["traces"]
            .as_array()
            .map(Vec::len),
        Some(6)
    );
}

// =============================================================================
// TOML configuration
// =============================================================================

#[test]
fn partial_toml_config_keeps_defaults() {
    let config: HermiteConfig = toml::from_str(
        r#"
        precision = 60
        tolerance = 1e-20
        "#,
    )
    .unwrap();
    assert_eq!(config.precision, 60);
    assert!((config.tolerance - 1e-20).abs() < 1e-30);
    assert_eq!(config.max_iterations, HermiteConfig::default().max_iterations);
    assert!(config.validate().is_ok());
}

#[test]
fn unknown_toml_keys_are_rejected() {
    let parsed: Result<HermiteConfig, _> = toml::from_str("precison = 60");
    assert!(parsed.is_err());
}

#[test]
fn config_serializes_back() {
    let text = toml::to_string(&HermiteConfig::default()).unwrap();
    let back: HermiteConfig = toml::from_str(&text).unwrap();
    assert_eq!(back, HermiteConfig::default());
}

use mpds_phases_model::{
    parse_pearson, parse_phase_url, parse_release_year, parse_space_group, AuditReport, Formula,
    PhaseRecord, ReleaseChecksums, ReleaseManifest, ReleaseStats,
};

#[test]
fn space_group_accepts_full_range_and_rejects_outside() {
    assert!(parse_space_group(1).is_ok());
    assert!(parse_space_group(230).is_ok());
    assert!(parse_space_group(0).is_err());
    assert!(parse_space_group(231).is_err());
}

#[test]
fn pearson_requires_two_letters_then_digits() {
    assert_eq!(parse_pearson("cF8").expect("cF8").atom_count(), Some(8));
    assert_eq!(parse_pearson("hP2").expect("hP2").atom_count(), Some(2));
    assert!(parse_pearson("cF").is_err());
    assert!(parse_pearson("c8").is_err());
    assert!(parse_pearson("8F8").is_err());
    assert!(parse_pearson("cF8x").is_err());
    assert!(parse_pearson(" cF8").is_err());
    assert!(parse_pearson("").is_err());
}

#[test]
fn phase_url_requires_positive_integer_suffix() {
    let url = parse_phase_url("https://mpds.io/phase_id/5019").expect("url");
    assert_eq!(url.phase_id(), Some(5019));
    assert!(parse_phase_url("https://mpds.io/phase_id/").is_err());
    assert!(parse_phase_url("https://mpds.io/phase_id/abc").is_err());
    assert!(parse_phase_url("https://mpds.io/phase_id/0").is_err());
    assert!(parse_phase_url("https://mpds.io/phase_id/5019 ").is_err());
    assert!(parse_phase_url("").is_err());
}

#[test]
fn formula_rejects_empty_parts() {
    assert!(Formula::new("Ge", "Ge cub").is_ok());
    assert!(Formula::new("", "Ge cub").is_err());
    assert!(Formula::new("Ge", "").is_err());
    assert!(Formula::new(" Ge", "Ge cub").is_err());
}

#[test]
fn record_validate_catches_out_of_range_space_group() {
    let raw = r#"{"id":"https://mpds.io/phase_id/5019","formula":{"short":"Ge","full":"Ge cub"},"spg":231,"pearson":"cF8","entries":1571,"articles":748}"#;
    let record: PhaseRecord = serde_json::from_str(raw).expect("deserializes without range check");
    let err = record.validate().expect_err("231 is out of range");
    assert!(err.to_string().contains("1..=230"), "unexpected: {err}");
}

#[test]
fn phase_key_is_the_identity_triple() {
    let raw = r#"{"id":"https://mpds.io/phase_id/5019","formula":{"short":"Ge","full":"Ge cub"},"spg":227,"pearson":"cF8","entries":1571,"articles":748}"#;
    let record: PhaseRecord = serde_json::from_str(raw).expect("record");
    assert_eq!(record.key().canonical_string(), "Ge/227/cF8");
}

#[test]
fn release_year_is_a_four_digit_year() {
    assert_eq!(parse_release_year("2023").expect("2023").as_str(), "2023");
    assert!(parse_release_year("23").is_err());
    assert!(parse_release_year("0203").is_err());
    assert!(parse_release_year("20x3").is_err());
    assert!(parse_release_year("").is_err());
}

#[test]
fn manifest_validate_strict_rejects_missing_signature() {
    let manifest = ReleaseManifest::new(
        "1".to_string(),
        parse_release_year("2023").expect("release"),
        ReleaseChecksums::new("a".repeat(64)),
        ReleaseStats::new(3, 10, 7),
    );
    assert!(manifest.validate_strict().is_err());
}

#[test]
fn manifest_validate_strict_rejects_zero_records() {
    let mut manifest = ReleaseManifest::new(
        "1".to_string(),
        parse_release_year("2023").expect("release"),
        ReleaseChecksums::new("a".repeat(64)),
        ReleaseStats::new(0, 0, 0),
    );
    manifest.records_signature_sha256 = "b".repeat(64);
    assert!(manifest.validate_strict().is_err());
}

#[test]
fn empty_report_is_clean_with_zeroed_summary() {
    let report = AuditReport::new(42);
    assert!(report.is_clean());
    let summary = report.severity_summary();
    assert_eq!(summary.get("ERROR"), Some(&0));
    assert_eq!(summary.get("WARN"), Some(&0));
}

// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use mpds_phases_audit::{read_release_file, validate_records, ReleaseFormat};
use mpds_phases_model::ViolationCode;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path)
}

#[test]
fn malformed_json_fails_hard() {
    let err = read_release_file(
        &fixture("tests/fixtures/release_malformed.json"),
        ReleaseFormat::Auto,
    )
    .expect_err("malformed file must fail");
    assert!(err.0.contains("not valid JSON"), "unexpected error: {}", err.0);
}

#[test]
fn top_level_object_is_rejected() {
    let err = mpds_phases_audit::decode_release_bytes(b"{\"id\": 1}", ReleaseFormat::Array)
        .expect_err("object is not a release");
    assert!(
        err.0.contains("must be a JSON array"),
        "unexpected error: {}",
        err.0
    );
}

#[test]
fn every_violation_is_collected_in_one_pass() {
    let raw = read_release_file(
        &fixture("tests/fixtures/release_violations.json"),
        ReleaseFormat::Array,
    )
    .expect("decode");
    let validated = validate_records(&raw);
    let report = &validated.report;

    assert_eq!(report.record_count, 8);

    let find = |index: u64, code: ViolationCode| {
        report
            .violations
            .iter()
            .find(|v| v.index == index && v.code == code)
    };

    let spg = find(1, ViolationCode::SpaceGroupRange).expect("spg 231 violation");
    assert_eq!(spg.field, "spg");
    assert_eq!(spg.value, "231");
    assert!(spg.message.contains("1..=230"));

    assert!(find(2, ViolationCode::PearsonFormat).is_some());
    let entries = find(3, ViolationCode::CountNotNonNegativeInteger).expect("negative entries");
    assert_eq!(entries.field, "entries");
    assert!(find(4, ViolationCode::IdFormat).is_some());
    assert!(find(5, ViolationCode::NotAnObject).is_some());
    let unknown = find(6, ViolationCode::UnknownField).expect("unknown field");
    assert_eq!(unknown.field, "comment");
    let missing = find(7, ViolationCode::MissingField).expect("missing articles");
    assert_eq!(missing.field, "articles");

    // The two structurally sound records still come back typed.
    assert_eq!(validated.records.len(), 2);
    assert_eq!(validated.records[0].id.phase_id(), Some(5019));
    assert_eq!(validated.records[1].id.phase_id(), Some(5025));
}

#[test]
fn duplicate_identity_triples_are_grouped() {
    let raw = read_release_file(
        &fixture("tests/fixtures/release_duplicates.json"),
        ReleaseFormat::Array,
    )
    .expect("decode");
    let validated = validate_records(&raw);

    assert_eq!(validated.report.duplicate_keys.len(), 1);
    let group = &validated.report.duplicate_keys[0];
    assert_eq!(group.key.canonical_string(), "Ge/227/cF8");
    assert_eq!(group.indexes, vec![0, 1]);
    assert_eq!(group.phase_ids, vec![5019, 5030]);
    assert!(!validated.is_clean());

    // All three records parse; uniqueness is a report-level finding.
    assert_eq!(validated.records.len(), 3);
}

#[test]
fn blank_lines_are_skipped_and_bad_lines_cite_their_number() {
    let clean = mpds_phases_audit::decode_release_bytes(
        b"\n{\"a\": 1}\n\n{\"b\": 2}\n",
        ReleaseFormat::JsonLines,
    )
    .expect("blank lines are fine");
    assert_eq!(clean.len(), 2);

    let err = mpds_phases_audit::decode_release_bytes(
        b"{\"a\": 1}\nnot json\n",
        ReleaseFormat::JsonLines,
    )
    .expect_err("bad line must fail");
    assert!(err.0.contains("line 2"), "unexpected error: {}", err.0);
}

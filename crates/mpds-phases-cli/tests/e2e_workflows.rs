use assert_cmd::Command;
use std::path::Path;

const VALID_RELEASE: &str = r#"[
  {"id": "https://mpds.io/phase_id/5019", "formula": {"short": "Ge", "full": "Ge cub"}, "spg": 227, "pearson": "cF8", "entries": 1571, "articles": 748},
  {"id": "https://mpds.io/phase_id/102536", "formula": {"short": "GeO2", "full": "GeO<sub>2</sub> tet"}, "spg": 136, "pearson": "tP6", "entries": 391, "articles": 204}
]"#;

const BAD_SPG_RELEASE: &str = r#"[
  {"id": "https://mpds.io/phase_id/5019", "formula": {"short": "Ge", "full": "Ge cub"}, "spg": 231, "pearson": "cF8", "entries": 1571, "articles": 748}
]"#;

const DUPLICATE_RELEASE: &str = r#"[
  {"id": "https://mpds.io/phase_id/5019", "formula": {"short": "Ge", "full": "Ge cub"}, "spg": 227, "pearson": "cF8", "entries": 1571, "articles": 748},
  {"id": "https://mpds.io/phase_id/5030", "formula": {"short": "Ge", "full": "Ge cub (hp)"}, "spg": 227, "pearson": "cF8", "entries": 3, "articles": 2}
]"#;

fn write_release(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write release file");
    path
}

#[test]
fn validate_json_workflow_is_parseable() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let release = write_release(tmp.path(), "release_2023.json", VALID_RELEASE);

    let output = Command::new(env!("CARGO_BIN_EXE_mpds-phases"))
        .args(["--json", "validate", "--path"])
        .arg(&release)
        .output()
        .expect("run validate");
    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("validate output json");
    assert_eq!(payload["clean"], true);
    assert_eq!(payload["record_count"], 2);
    assert_eq!(payload["violations"].as_array().map(Vec::len), Some(0));
}

#[test]
fn validate_reports_every_violation_and_exits_3() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let release = write_release(tmp.path(), "release_bad.json", BAD_SPG_RELEASE);
    let report_out = tmp.path().join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_mpds-phases"))
        .args(["--json", "validate", "--report-out"])
        .arg(&report_out)
        .arg("--path")
        .arg(&release)
        .output()
        .expect("run validate");
    assert_eq!(output.status.code(), Some(3));

    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("validate output json");
    assert_eq!(payload["clean"], false);
    assert_eq!(payload["violations"][0]["code"], "space_group_range");
    assert_eq!(payload["violations"][0]["index"], 0);

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&report_out).expect("report file"))
            .expect("report json");
    assert_eq!(report["record_count"], 1);
    assert_eq!(report["violations"].as_array().map(Vec::len), Some(1));
}

#[test]
fn manifest_workflow_writes_a_validated_manifest() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let release = write_release(tmp.path(), "release_2023.json", VALID_RELEASE);
    let out = tmp.path().join("manifest.json");

    let output = Command::new(env!("CARGO_BIN_EXE_mpds-phases"))
        .args(["--json", "manifest", "--release", "2023", "--out"])
        .arg(&out)
        .arg("--path")
        .arg(&release)
        .output()
        .expect("run manifest");
    assert!(output.status.success());

    let manifest: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).expect("manifest file"))
            .expect("manifest json");
    assert_eq!(manifest["release"], "2023");
    assert_eq!(manifest["stats"]["record_count"], 2);
    assert_eq!(manifest["stats"]["entry_total"], 1571 + 391);
    assert_eq!(
        manifest["records_signature_sha256"]
            .as_str()
            .map(str::len),
        Some(64)
    );
}

#[test]
fn manifest_refuses_a_release_with_duplicate_keys() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let release = write_release(tmp.path(), "release_dup.json", DUPLICATE_RELEASE);
    let out = tmp.path().join("manifest.json");

    let output = Command::new(env!("CARGO_BIN_EXE_mpds-phases"))
        .args(["manifest", "--release", "2023", "--out"])
        .arg(&out)
        .arg("--path")
        .arg(&release)
        .output()
        .expect("run manifest");
    assert_eq!(output.status.code(), Some(3));
    assert!(!out.exists());
}

#[test]
fn inspect_reports_count_and_sample() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let release = write_release(tmp.path(), "release_2023.json", VALID_RELEASE);

    let output = Command::new(env!("CARGO_BIN_EXE_mpds-phases"))
        .args(["--json", "inspect", "--sample-rows", "1", "--path"])
        .arg(&release)
        .output()
        .expect("run inspect");
    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("inspect output json");
    assert_eq!(payload["record_count"], 2);
    assert_eq!(payload["sample"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["sample"][0]["pearson"], "cF8");
}

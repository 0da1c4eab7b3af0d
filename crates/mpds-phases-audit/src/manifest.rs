// SPDX-License-Identifier: Apache-2.0

use crate::AuditError;
use mpds_phases_core::{canonical, sha256_hex};
use mpds_phases_model::{
    AuditReport, PhaseRecord, ReleaseChecksums, ReleaseManifest, ReleaseStats, ReleaseYear,
    ValidationError,
};
use std::fs;
use std::path::Path;

/// Builds the publication manifest for one validated snapshot. The checksum
/// covers the source bytes as published; the signature covers the canonical
/// form of the records, so it is stable under key reordering in the file.
pub fn build_release_manifest(
    release: &ReleaseYear,
    source_bytes: &[u8],
    source_filename: &str,
    records: &[PhaseRecord],
) -> Result<ReleaseManifest, AuditError> {
    let mut entry_total = 0_u64;
    let mut article_total = 0_u64;
    for record in records {
        entry_total += record.entries;
        article_total += record.articles;
    }

    let mut manifest = ReleaseManifest::new(
        "1".to_string(),
        release.clone(),
        ReleaseChecksums::new(sha256_hex(source_bytes)),
        ReleaseStats::new(records.len() as u64, entry_total, article_total),
    );
    manifest.records_signature_sha256 = records_signature_merkle(records)?;
    manifest.source_filename = source_filename.to_string();

    manifest
        .validate_strict()
        .map_err(|e: ValidationError| AuditError(e.to_string()))?;
    Ok(manifest)
}

pub fn write_release_manifest(path: &Path, manifest: &ReleaseManifest) -> Result<(), AuditError> {
    let bytes =
        canonical::stable_json_bytes(manifest).map_err(|e| AuditError(e.to_string()))?;
    fs::write(path, bytes)
        .map_err(|e| AuditError(format!("failed to write {}: {e}", path.display())))
}

pub fn write_audit_report(path: &Path, report: &AuditReport) -> Result<(), AuditError> {
    let bytes = canonical::stable_json_bytes(report).map_err(|e| AuditError(e.to_string()))?;
    fs::write(path, bytes)
        .map_err(|e| AuditError(format!("failed to write {}: {e}", path.display())))
}

/// Merkle root over the canonical JSON hash of each record.
pub fn records_signature_merkle(records: &[PhaseRecord]) -> Result<String, AuditError> {
    let leaves: Vec<String> = records
        .iter()
        .map(canonical::stable_json_hash_hex)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AuditError(e.to_string()))?;
    Ok(merkle_root(&leaves))
}

fn merkle_root(leaves: &[String]) -> String {
    if leaves.is_empty() {
        return sha256_hex(b"");
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut i = 0usize;
        while i < level.len() {
            let left = &level[i];
            let right = if i + 1 < level.len() {
                &level[i + 1]
            } else {
                left
            };
            let mut joined = String::with_capacity(left.len() + right.len());
            joined.push_str(left);
            joined.push_str(right);
            next.push(sha256_hex(joined.as_bytes()));
            i += 2;
        }
        level = next;
    }
    level[0].clone()
}

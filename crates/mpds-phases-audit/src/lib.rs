// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod decode;
mod logging;
mod manifest;
mod validate;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const CRATE_NAME: &str = "mpds-phases-audit";

pub use decode::{decode_release_bytes, read_release_file, ReleaseFormat};
pub use logging::{AuditEvent, AuditLog, AuditStage};
pub use manifest::{
    build_release_manifest, records_signature_merkle, write_audit_report, write_release_manifest,
};
pub use validate::{validate_records, ValidatedRelease};

#[derive(Debug)]
pub struct AuditError(pub String);
impl Display for AuditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for AuditError {}

#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub input_path: PathBuf,
    pub format: ReleaseFormat,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            format: ReleaseFormat::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub validated: ValidatedRelease,
    pub events: Vec<AuditEvent>,
}

/// Single-pass audit of one release file: Prepare, Decode, Validate,
/// Finalize. Field-level problems land in the returned report; only
/// unreadable input (I/O, malformed JSON) is a hard error.
pub fn audit_release(opts: &AuditOptions) -> Result<AuditOutcome, AuditError> {
    let mut log = logging::AuditLog::default();
    if opts.input_path.as_os_str().is_empty() {
        return Err(AuditError(
            "input path is required; implicit default input is forbidden".to_string(),
        ));
    }
    log.emit(
        logging::AuditStage::Prepare,
        "audit.start",
        BTreeMap::from([(
            "input".to_string(),
            opts.input_path.display().to_string(),
        )]),
    );

    let raw = decode::read_release_file(&opts.input_path, opts.format)?;
    log.emit(
        logging::AuditStage::Decode,
        "audit.decode.complete",
        BTreeMap::from([("records".to_string(), raw.len().to_string())]),
    );

    let validated = validate::validate_records(&raw);
    log.emit(
        logging::AuditStage::Validate,
        "audit.validate.complete",
        BTreeMap::from([
            (
                "violations".to_string(),
                validated.report.violations.len().to_string(),
            ),
            (
                "duplicate_keys".to_string(),
                validated.report.duplicate_keys.len().to_string(),
            ),
        ]),
    );

    log.emit(
        logging::AuditStage::Finalize,
        "audit.complete",
        BTreeMap::new(),
    );
    Ok(AuditOutcome {
        validated,
        events: log.events().to_vec(),
    })
}

/// In-memory variant for callers that already hold the release bytes.
pub fn audit_release_bytes(
    bytes: &[u8],
    format: ReleaseFormat,
) -> Result<ValidatedRelease, AuditError> {
    let raw = decode::decode_release_bytes(bytes, format)?;
    Ok(validate::validate_records(&raw))
}

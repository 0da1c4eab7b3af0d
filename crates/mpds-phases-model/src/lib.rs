#![forbid(unsafe_code)]
//! Distinct-phases model SSOT.
//!
//! ```compile_fail
//! use mpds_phases_model::QcSeverity;
//!
//! fn exhaustive_match(s: QcSeverity) -> &'static str {
//!     match s {
//!         QcSeverity::Info => "i",
//!         QcSeverity::Warn => "w",
//!         QcSeverity::Error => "e",
//!     }
//! }
//! ```

mod phase;
mod release;
mod report;

pub use phase::{
    parse_pearson, parse_phase_url, parse_space_group, Formula, ParseError, PearsonSymbol,
    PhaseKey, PhaseRecord, PhaseUrl, SpaceGroup, FORMULA_FULL_MAX_LEN, FORMULA_SHORT_MAX_LEN,
    PEARSON_MAX_LEN, PHASE_URL_MAX_LEN, SPACE_GROUP_MAX, SPACE_GROUP_MIN,
};
pub use release::{
    parse_release_year, ReleaseChecksums, ReleaseManifest, ReleaseStats, ReleaseYear,
    ValidationError, RELEASE_YEAR_LEN,
};
pub use report::{AuditReport, DuplicateKeyGroup, QcSeverity, Violation, ViolationCode};

pub const CRATE_NAME: &str = "mpds-phases-model";

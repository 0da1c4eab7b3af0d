use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const RELEASE_YEAR_LEN: usize = 4;

pub fn parse_release_year(input: &str) -> Result<ReleaseYear, ValidationError> {
    ReleaseYear::parse(input)
}

/// Release snapshots are named by year; a release identifier is the
/// four-digit year string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct ReleaseYear(String);

impl ReleaseYear {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("release must not be empty".to_string()));
        }
        if s.len() != RELEASE_YEAR_LEN || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError(
                "release must be a four-digit year (e.g. 2023)".to_string(),
            ));
        }
        if s.starts_with('0') {
            return Err(ValidationError(
                "release year must not start with 0".to_string(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ReleaseYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct ReleaseChecksums {
    pub records_sha256: String,
}

impl ReleaseChecksums {
    #[must_use]
    pub fn new(records_sha256: String) -> Self {
        Self { records_sha256 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct ReleaseStats {
    pub record_count: u64,
    pub entry_total: u64,
    pub article_total: u64,
}

impl ReleaseStats {
    #[must_use]
    pub fn new(record_count: u64, entry_total: u64, article_total: u64) -> Self {
        Self {
            record_count,
            entry_total,
            article_total,
        }
    }
}

/// Publication manifest for one yearly snapshot. Records are immutable once
/// published; a later release may add records or update the per-phase counts
/// but never renumbers phase identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct ReleaseManifest {
    pub manifest_version: String,
    pub release: ReleaseYear,
    pub checksums: ReleaseChecksums,
    pub stats: ReleaseStats,
    #[serde(default)]
    pub records_signature_sha256: String,
    #[serde(default)]
    pub source_filename: String,
    #[serde(default)]
    pub created_at: String,
}

impl ReleaseManifest {
    #[must_use]
    pub fn new(
        manifest_version: String,
        release: ReleaseYear,
        checksums: ReleaseChecksums,
        stats: ReleaseStats,
    ) -> Self {
        Self {
            manifest_version,
            release,
            checksums,
            stats,
            records_signature_sha256: String::new(),
            source_filename: String::new(),
            created_at: String::new(),
        }
    }

    pub fn validate_strict(&self) -> Result<(), ValidationError> {
        if self.manifest_version.trim().is_empty() {
            return Err(ValidationError(
                "manifest_version must not be empty".to_string(),
            ));
        }
        if self.checksums.records_sha256.trim().is_empty() {
            return Err(ValidationError(
                "checksums.records_sha256 must not be empty".to_string(),
            ));
        }
        if self.records_signature_sha256.trim().is_empty() {
            return Err(ValidationError(
                "records_signature_sha256 must not be empty".to_string(),
            ));
        }
        if self.stats.record_count == 0 {
            return Err(ValidationError(
                "stats.record_count must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

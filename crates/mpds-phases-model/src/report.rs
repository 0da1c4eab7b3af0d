// SPDX-License-Identifier: Apache-2.0

use crate::phase::PhaseKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum QcSeverity {
    Info,
    Warn,
    Error,
}

impl QcSeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationCode {
    NotAnObject,
    MissingField,
    UnknownField,
    IdFormat,
    FormulaFormat,
    SpaceGroupRange,
    PearsonFormat,
    CountNotNonNegativeInteger,
    DuplicateKey,
}

impl ViolationCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::MissingField => "missing_field",
            Self::UnknownField => "unknown_field",
            Self::IdFormat => "id_format",
            Self::FormulaFormat => "formula_format",
            Self::SpaceGroupRange => "space_group_range",
            Self::PearsonFormat => "pearson_format",
            Self::CountNotNonNegativeInteger => "count_not_non_negative_integer",
            Self::DuplicateKey => "duplicate_key",
        }
    }
}

impl Display for ViolationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level problem in a release file, with enough detail to locate
/// it in the source: record index, field name, and the offending value
/// rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct Violation {
    pub index: u64,
    pub field: String,
    pub code: ViolationCode,
    pub severity: QcSeverity,
    pub message: String,
    pub value: String,
}

impl Violation {
    #[must_use]
    pub fn new(index: u64, field: &str, code: ViolationCode, message: String, value: String) -> Self {
        Self {
            index,
            field: field.to_string(),
            code,
            severity: QcSeverity::Error,
            message,
            value,
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "record {} field {}: {} (value: {})",
            self.index, self.field, self.message, self.value
        )
    }
}

/// Records sharing one identity triple. `phase_ids` lists the identifier of
/// every member that carried a parseable id, alongside the record indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct DuplicateKeyGroup {
    pub key: PhaseKey,
    pub indexes: Vec<u64>,
    pub phase_ids: Vec<u64>,
}

impl DuplicateKeyGroup {
    #[must_use]
    pub fn new(key: PhaseKey, indexes: Vec<u64>, phase_ids: Vec<u64>) -> Self {
        Self {
            key,
            indexes,
            phase_ids,
        }
    }
}

/// Full audit outcome for one release file. Every violating record index and
/// field is enumerated; validation never stops at the first problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct AuditReport {
    pub schema_version: u32,
    pub record_count: u64,
    pub violations: Vec<Violation>,
    pub duplicate_keys: Vec<DuplicateKeyGroup>,
}

impl AuditReport {
    #[must_use]
    pub fn new(record_count: u64) -> Self {
        Self {
            schema_version: 1,
            record_count,
            violations: Vec::new(),
            duplicate_keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.duplicate_keys.is_empty()
    }

    #[must_use]
    pub fn severity_summary(&self) -> BTreeMap<&'static str, u64> {
        let mut summary = BTreeMap::new();
        for severity in [QcSeverity::Info, QcSeverity::Warn, QcSeverity::Error] {
            summary.insert(severity.as_str(), 0);
        }
        for violation in &self.violations {
            *summary.entry(violation.severity.as_str()).or_insert(0) += 1;
        }
        if let Some(errors) = summary.get_mut(QcSeverity::Error.as_str()) {
            *errors += self.duplicate_keys.len() as u64;
        }
        summary
    }
}

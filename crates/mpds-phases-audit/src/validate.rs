// SPDX-License-Identifier: Apache-2.0

use crate::decode::json_type_name;
use mpds_phases_model::{
    parse_pearson, parse_phase_url, parse_space_group, AuditReport, DuplicateKeyGroup, Formula,
    PearsonSymbol, PhaseKey, PhaseRecord, PhaseUrl, SpaceGroup, Violation, ViolationCode,
};
use serde_json::Value;
use std::collections::BTreeMap;

const RENDERED_VALUE_MAX_LEN: usize = 120;

const RECORD_FIELDS: [&str; 6] = ["id", "formula", "spg", "pearson", "entries", "articles"];
const FORMULA_FIELDS: [&str; 2] = ["short", "full"];

#[derive(Debug, Clone)]
pub struct ValidatedRelease {
    pub records: Vec<PhaseRecord>,
    pub report: AuditReport,
}

impl ValidatedRelease {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.report.is_clean()
    }
}

/// Checks every record against the schema and the cross-record uniqueness
/// invariant, collecting every violation instead of stopping at the first.
/// Records in source order; indexes in the report refer to source positions.
#[must_use]
pub fn validate_records(raw: &[Value]) -> ValidatedRelease {
    let mut report = AuditReport::new(raw.len() as u64);
    let mut records = Vec::new();
    let mut by_key: BTreeMap<PhaseKey, (Vec<u64>, Vec<u64>)> = BTreeMap::new();

    for (index, value) in raw.iter().enumerate() {
        let index = index as u64;
        let Some(object) = value.as_object() else {
            report.violations.push(Violation::new(
                index,
                "",
                ViolationCode::NotAnObject,
                format!("record must be an object, got {}", json_type_name(value)),
                render_value(value),
            ));
            continue;
        };

        for key in object.keys() {
            if !RECORD_FIELDS.contains(&key.as_str()) {
                report.violations.push(Violation::new(
                    index,
                    key,
                    ViolationCode::UnknownField,
                    "field is not part of the record schema".to_string(),
                    render_value(&object[key]),
                ));
            }
        }

        let before = report.violations.len();
        let id = check_id(index, object, &mut report);
        let formula = check_formula(index, object, &mut report);
        let spg = check_space_group(index, object, &mut report);
        let pearson = check_pearson(index, object, &mut report);
        let entries = check_count(index, "entries", object, &mut report);
        let articles = check_count(index, "articles", object, &mut report);

        let (Some(id), Some(formula), Some(spg), Some(pearson), Some(entries), Some(articles)) =
            (id, formula, spg, pearson, entries, articles)
        else {
            debug_assert!(report.violations.len() > before);
            continue;
        };

        let record = PhaseRecord::new(id, formula, spg, pearson, entries, articles);
        let group = by_key.entry(record.key()).or_default();
        group.0.push(index);
        if let Some(phase_id) = record.id.phase_id() {
            group.1.push(phase_id);
        }
        records.push(record);
    }

    for (key, (indexes, phase_ids)) in by_key {
        if indexes.len() > 1 {
            report
                .duplicate_keys
                .push(DuplicateKeyGroup::new(key, indexes, phase_ids));
        }
    }

    ValidatedRelease { records, report }
}

fn check_id(
    index: u64,
    object: &serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<PhaseUrl> {
    let value = require_field(index, "id", object, report)?;
    let Some(raw) = value.as_str() else {
        report.violations.push(Violation::new(
            index,
            "id",
            ViolationCode::IdFormat,
            format!("id must be a string, got {}", json_type_name(value)),
            render_value(value),
        ));
        return None;
    };
    match parse_phase_url(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            report.violations.push(Violation::new(
                index,
                "id",
                ViolationCode::IdFormat,
                e.to_string(),
                raw.to_string(),
            ));
            None
        }
    }
}

fn check_formula(
    index: u64,
    object: &serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<Formula> {
    let value = require_field(index, "formula", object, report)?;
    let Some(formula_object) = value.as_object() else {
        report.violations.push(Violation::new(
            index,
            "formula",
            ViolationCode::FormulaFormat,
            format!("formula must be an object, got {}", json_type_name(value)),
            render_value(value),
        ));
        return None;
    };

    for key in formula_object.keys() {
        if !FORMULA_FIELDS.contains(&key.as_str()) {
            report.violations.push(Violation::new(
                index,
                &format!("formula.{key}"),
                ViolationCode::UnknownField,
                "field is not part of the formula schema".to_string(),
                render_value(&formula_object[key]),
            ));
        }
    }

    let short = formula_part(index, "short", formula_object, report);
    let full = formula_part(index, "full", formula_object, report);
    let (short, full) = (short?, full?);
    match Formula::new(short, full) {
        Ok(formula) => Some(formula),
        Err(e) => {
            report.violations.push(Violation::new(
                index,
                "formula",
                ViolationCode::FormulaFormat,
                e.to_string(),
                format!("short={short} full={full}"),
            ));
            None
        }
    }
}

fn formula_part<'a>(
    index: u64,
    part: &str,
    formula_object: &'a serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<&'a str> {
    let field = format!("formula.{part}");
    let Some(value) = formula_object.get(part) else {
        report.violations.push(Violation::new(
            index,
            &field,
            ViolationCode::MissingField,
            "required field is missing".to_string(),
            String::new(),
        ));
        return None;
    };
    let Some(raw) = value.as_str() else {
        report.violations.push(Violation::new(
            index,
            &field,
            ViolationCode::FormulaFormat,
            format!("{field} must be a string, got {}", json_type_name(value)),
            render_value(value),
        ));
        return None;
    };
    Some(raw)
}

fn check_space_group(
    index: u64,
    object: &serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<SpaceGroup> {
    let value = require_field(index, "spg", object, report)?;
    let Some(raw) = value.as_u64() else {
        report.violations.push(Violation::new(
            index,
            "spg",
            ViolationCode::SpaceGroupRange,
            format!(
                "spg must be an integer within 1..=230, got {}",
                json_type_name(value)
            ),
            render_value(value),
        ));
        return None;
    };
    match parse_space_group(raw) {
        Ok(spg) => Some(spg),
        Err(e) => {
            report.violations.push(Violation::new(
                index,
                "spg",
                ViolationCode::SpaceGroupRange,
                e.to_string(),
                raw.to_string(),
            ));
            None
        }
    }
}

fn check_pearson(
    index: u64,
    object: &serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<PearsonSymbol> {
    let value = require_field(index, "pearson", object, report)?;
    let Some(raw) = value.as_str() else {
        report.violations.push(Violation::new(
            index,
            "pearson",
            ViolationCode::PearsonFormat,
            format!("pearson must be a string, got {}", json_type_name(value)),
            render_value(value),
        ));
        return None;
    };
    match parse_pearson(raw) {
        Ok(pearson) => Some(pearson),
        Err(e) => {
            report.violations.push(Violation::new(
                index,
                "pearson",
                ViolationCode::PearsonFormat,
                e.to_string(),
                raw.to_string(),
            ));
            None
        }
    }
}

fn check_count(
    index: u64,
    field: &str,
    object: &serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<u64> {
    let value = require_field(index, field, object, report)?;
    match value.as_u64() {
        Some(count) => Some(count),
        None => {
            report.violations.push(Violation::new(
                index,
                field,
                ViolationCode::CountNotNonNegativeInteger,
                format!("{field} must be a non-negative integer"),
                render_value(value),
            ));
            None
        }
    }
}

fn require_field<'a>(
    index: u64,
    field: &str,
    object: &'a serde_json::Map<String, Value>,
    report: &mut AuditReport,
) -> Option<&'a Value> {
    let value = object.get(field);
    if value.is_none() {
        report.violations.push(Violation::new(
            index,
            field,
            ViolationCode::MissingField,
            "required field is missing".to_string(),
            String::new(),
        ));
    }
    value
}

fn render_value(value: &Value) -> String {
    let mut rendered = value.to_string();
    if rendered.len() > RENDERED_VALUE_MAX_LEN {
        let mut cut = RENDERED_VALUE_MAX_LEN;
        while !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        rendered.truncate(cut);
        rendered.push_str("...");
    }
    rendered
}

// SPDX-License-Identifier: Apache-2.0

use crate::AuditError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Release files are published as one JSON array per snapshot; working
/// exports exchanged by the curation pipeline are JSON Lines. Auto looks at
/// the first non-whitespace byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseFormat {
    Auto,
    Array,
    JsonLines,
}

pub fn read_release_file(path: &Path, format: ReleaseFormat) -> Result<Vec<Value>, AuditError> {
    let bytes = fs::read(path)
        .map_err(|e| AuditError(format!("failed to read {}: {e}", path.display())))?;
    decode_release_bytes(&bytes, format)
}

pub fn decode_release_bytes(bytes: &[u8], format: ReleaseFormat) -> Result<Vec<Value>, AuditError> {
    match resolve_format(bytes, format) {
        ReleaseFormat::JsonLines => decode_json_lines(bytes),
        _ => decode_array(bytes),
    }
}

fn resolve_format(bytes: &[u8], format: ReleaseFormat) -> ReleaseFormat {
    match format {
        ReleaseFormat::Auto => {
            let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
            if first == Some(&b'[') {
                ReleaseFormat::Array
            } else {
                ReleaseFormat::JsonLines
            }
        }
        explicit => explicit,
    }
}

fn decode_array(bytes: &[u8]) -> Result<Vec<Value>, AuditError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AuditError(format!("release file is not valid JSON: {e}")))?;
    match value {
        Value::Array(records) => Ok(records),
        other => Err(AuditError(format!(
            "release file must be a JSON array of records, got {}",
            json_type_name(&other)
        ))),
    }
}

fn decode_json_lines(bytes: &[u8]) -> Result<Vec<Value>, AuditError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AuditError(format!("release file is not valid UTF-8: {e}")))?;
    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|e| {
            AuditError(format!("line {} is not valid JSON: {e}", line_no + 1))
        })?;
        records.push(value);
    }
    Ok(records)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

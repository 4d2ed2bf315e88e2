//! Normalization of raw type labels into [`CanonicalType`].
//!
//! One function per origin system keeps every vocabulary quirk here, so the
//! compatibility rules and the mapping validator stay origin-agnostic.
//! Canonicalization is total: labels outside a vocabulary map to
//! [`CanonicalType::Unknown`].

use crate::types::{CanonicalType, OriginSystem};

/// Caveat attached to document identifiers that canonicalize to `string`.
pub const OBJECT_ID_CAVEAT: &str = "Ensure string is a valid ObjectId format (24 hex characters)";

/// Canonical type plus an optional caveat about the original label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonicalized {
    pub canonical: CanonicalType,
    pub caveat: Option<&'static str>,
}

impl Canonicalized {
    fn plain(canonical: CanonicalType) -> Self {
        Self {
            canonical,
            caveat: None,
        }
    }
}

/// Normalize a raw type label reported by `origin`.
pub fn canonicalize(raw_type: &str, origin: OriginSystem) -> CanonicalType {
    canonicalize_detailed(raw_type, origin).canonical
}

/// Normalize a raw type label, keeping any caveat the label carries.
pub fn canonicalize_detailed(raw_type: &str, origin: OriginSystem) -> Canonicalized {
    let lowered = raw_type.trim().to_ascii_lowercase();
    match origin {
        OriginSystem::Json => Canonicalized::plain(json_type(&lowered)),
        OriginSystem::Sql => Canonicalized::plain(sql_type(&lowered)),
        OriginSystem::Document => document_type(&lowered),
    }
}

fn json_type(lowered: &str) -> CanonicalType {
    match lowered {
        "string" => CanonicalType::String,
        "number" | "float" | "double" => CanonicalType::Float,
        "integer" | "int" => CanonicalType::Integer,
        "boolean" | "bool" => CanonicalType::Boolean,
        "date" => CanonicalType::Date,
        "datetime" => CanonicalType::Datetime,
        "object" => CanonicalType::Object,
        "array" => CanonicalType::Array,
        _ => CanonicalType::Unknown,
    }
}

fn sql_type(lowered: &str) -> CanonicalType {
    if lowered.is_empty() {
        return CanonicalType::Unknown;
    }

    let normalized = strip_modifiers(&compact_parens(lowered));
    // `tinyint(1)` is the MySQL boolean; its width must be read before suffixes are dropped.
    if normalized == "tinyint(1)" {
        return CanonicalType::Boolean;
    }

    if normalized.ends_with("[]") || normalized == "array" || is_pg_array_udt(&normalized) {
        return CanonicalType::Array;
    }

    let base = sql_base_name(&normalized);
    match base.as_str() {
        "int" | "integer" | "bigint" | "smallint" | "tinyint" | "mediumint" | "int2" | "int4"
        | "int8" | "serial" | "serial4" | "serial8" | "bigserial" | "smallserial" => {
            CanonicalType::Integer
        }
        "float" | "double" | "double precision" | "decimal" | "numeric" | "real" | "money"
        | "smallmoney" | "float4" | "float8" | "number" => CanonicalType::Float,
        "bool" | "boolean" | "bit" => CanonicalType::Boolean,
        "varchar" | "char" | "character" | "character varying" | "nvarchar" | "nchar"
        | "varchar2" | "nvarchar2" | "citext" | "uuid" | "uniqueidentifier" | "string" => {
            CanonicalType::String
        }
        "date" => CanonicalType::Date,
        "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" | "timestamptz" => {
            CanonicalType::Datetime
        }
        "json" | "jsonb" => CanonicalType::Object,
        other if other.ends_with("text") => CanonicalType::String,
        other if other.starts_with("timestamp") => CanonicalType::Datetime,
        _ => CanonicalType::Unknown,
    }
}

/// Remove whitespace inside and directly before parentheses: `tinyint ( 1 )` -> `tinyint(1)`.
fn compact_parens(lowered: &str) -> String {
    let mut out = String::with_capacity(lowered.len());
    let mut depth = 0usize;
    for ch in lowered.chars() {
        match ch {
            '(' => {
                let trimmed = out.trim_end().len();
                out.truncate(trimmed);
                depth += 1;
                out.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                out.push(ch);
            }
            ch if ch.is_whitespace() && depth > 0 => {}
            ch => out.push(ch),
        }
    }
    out
}

/// Drop integer display modifiers and collapse runs of whitespace.
fn strip_modifiers(label: &str) -> String {
    label
        .split_whitespace()
        .filter(|word| !matches!(*word, "unsigned" | "zerofill" | "signed"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop length/precision suffixes.
fn sql_base_name(normalized: &str) -> String {
    let base = match normalized.find('(') {
        Some(idx) => match normalized[idx..].find(')') {
            Some(end) => format!("{}{}", &normalized[..idx], &normalized[idx + end + 1..]),
            None => normalized.to_string(),
        },
        None => normalized.to_string(),
    };
    base.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_pg_array_udt(lowered: &str) -> bool {
    lowered.len() > 1
        && lowered.starts_with('_')
        && lowered[1..].chars().all(|ch| ch.is_ascii_alphanumeric())
}

fn document_type(lowered: &str) -> Canonicalized {
    let canonical = match lowered {
        "objectid" => {
            return Canonicalized {
                canonical: CanonicalType::String,
                caveat: Some(OBJECT_ID_CAVEAT),
            };
        }
        "str" | "string" | "text" => CanonicalType::String,
        "int" | "integer" | "int32" | "int64" | "long" => CanonicalType::Integer,
        "float" | "double" | "decimal" | "decimal128" | "number" => CanonicalType::Float,
        "bool" | "boolean" => CanonicalType::Boolean,
        "date" => CanonicalType::Date,
        "datetime" | "timestamp" => CanonicalType::Datetime,
        "array" | "list" => CanonicalType::Array,
        "dict" | "object" => CanonicalType::Object,
        other if other.starts_with("array[") || other.starts_with("list[") => CanonicalType::Array,
        _ => CanonicalType::Unknown,
    };
    Canonicalized::plain(canonical)
}

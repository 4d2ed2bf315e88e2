//! Field-level compatibility between a (post-transformation) source type and
//! a target type.
//!
//! The rules signal possible conversions; they never coerce. A mapping that
//! needs a conversion stays marked until the caller adds the named transform.

use serde::{Deserialize, Serialize};

use crate::types::CanonicalType;

/// Outcome of resolving a source type against a target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub compatible: bool,
    pub conversion_needed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Compatibility {
    fn direct() -> Self {
        Self {
            compatible: true,
            conversion_needed: false,
            warning: None,
        }
    }

    fn needs(warning: &str) -> Self {
        Self {
            compatible: true,
            conversion_needed: true,
            warning: Some(warning.to_string()),
        }
    }

    fn incompatible(source: CanonicalType, target: CanonicalType) -> Self {
        Self {
            compatible: false,
            conversion_needed: false,
            warning: Some(format!("Cannot convert {source} to {target}")),
        }
    }
}

/// Decide whether `source` values can land in a `target` field.
///
/// Rules are tried in order and the first match wins:
/// 1. identical types are compatible;
/// 2. same-family pairs are compatible without conversion;
/// 3. known bridges are compatible but need the named transform;
/// 4. everything else is incompatible.
pub fn resolve(source: CanonicalType, target: CanonicalType) -> Compatibility {
    if source == target {
        return Compatibility::direct();
    }

    if same_family(source, target) {
        return Compatibility::direct();
    }

    if let Some(warning) = conversion_hint(source, target) {
        return Compatibility::needs(warning);
    }

    Compatibility::incompatible(source, target)
}

fn same_family(source: CanonicalType, target: CanonicalType) -> bool {
    (source.is_numeric() && target.is_numeric())
        || (source.is_temporal() && target.is_temporal())
        || matches!(
            (source, target),
            (CanonicalType::Object, CanonicalType::Array)
                | (CanonicalType::Array, CanonicalType::Object)
        )
}

fn conversion_hint(source: CanonicalType, target: CanonicalType) -> Option<&'static str> {
    use CanonicalType::*;

    let hint = match (source, target) {
        (String, Integer) => "String to integer conversion - use parse_int transformation",
        (String, Float) => "String to float conversion - use parse_float transformation",
        (String, Boolean) => "String to boolean conversion - use parse_bool transformation",
        (String, Date) => "String to date conversion - use parse_date transformation",
        (String, Datetime) => "String to datetime conversion - use parse_datetime transformation",
        (Integer | Float, String) => "Number to string conversion - use to_string transformation",
        (Boolean, String) => "Boolean to string conversion - use to_string transformation",
        (Object, String) => "Object to string conversion - use json_stringify transformation",
        (String, Array | Object) => "String to JSON conversion - use json_parse transformation",
        _ => return None,
    };
    Some(hint)
}

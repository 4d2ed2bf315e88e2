//! Tagged sample values and flattening of a sampled record into source fields.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};
use crate::schema::SourceField;
use crate::types::CanonicalType;

/// A dynamically-typed value captured from a source sample.
///
/// Objects keep their keys in sample order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SampleValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<SampleValue>),
    Object(Vec<(String, SampleValue)>),
}

impl SampleValue {
    /// Runtime type label as reported by a JSON sample.
    pub fn type_label(&self) -> &'static str {
        match self {
            SampleValue::Null => "null",
            SampleValue::Bool(_) => "boolean",
            SampleValue::Integer(_) => "integer",
            SampleValue::Float(_) => "float",
            SampleValue::String(_) => "string",
            SampleValue::Array(_) => "array",
            SampleValue::Object(_) => "object",
        }
    }

    /// Canonical category of this runtime value. `null` carries no type.
    pub fn canonical_type(&self) -> CanonicalType {
        match self {
            SampleValue::Null => CanonicalType::Unknown,
            SampleValue::Bool(_) => CanonicalType::Boolean,
            SampleValue::Integer(_) => CanonicalType::Integer,
            SampleValue::Float(_) => CanonicalType::Float,
            SampleValue::String(_) => CanonicalType::String,
            SampleValue::Array(_) => CanonicalType::Array,
            SampleValue::Object(_) => CanonicalType::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SampleValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SampleValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SampleValue::Integer(value) => Some(*value as f64),
            SampleValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SampleValue> {
        match self {
            SampleValue::Object(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Resolve a dotted/indexed path (`items[0].sku`) against this value.
    ///
    /// Returns `Ok(None)` when the path is well-formed but absent.
    pub fn at_path(&self, path: &str) -> Result<Option<&SampleValue>> {
        let mut current = self;
        for segment in parse_path(path)? {
            let next = match (segment, current) {
                (PathSegment::Key(key), SampleValue::Object(_)) => current.get(key),
                (PathSegment::Index(idx), SampleValue::Array(items)) => items.get(idx),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Render the value the way a JSON serializer would.
    pub fn to_json_string(&self) -> String {
        Value::from(self.clone()).to_string()
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Null => f.write_str("null"),
            SampleValue::Bool(value) => write!(f, "{value}"),
            SampleValue::Integer(value) => write!(f, "{value}"),
            SampleValue::Float(value) => write!(f, "{value}"),
            SampleValue::String(value) => f.write_str(value),
            SampleValue::Array(_) | SampleValue::Object(_) => f.write_str(&self.to_json_string()),
        }
    }
}

impl From<Value> for SampleValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SampleValue::Null,
            Value::Bool(value) => SampleValue::Bool(value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => SampleValue::Integer(value),
                None => SampleValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(value) => SampleValue::String(value),
            Value::Array(items) => {
                SampleValue::Array(items.into_iter().map(SampleValue::from).collect())
            }
            Value::Object(entries) => SampleValue::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, SampleValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<SampleValue> for Value {
    fn from(value: SampleValue) -> Self {
        match value {
            SampleValue::Null => Value::Null,
            SampleValue::Bool(value) => Value::Bool(value),
            SampleValue::Integer(value) => Value::Number(Number::from(value)),
            SampleValue::Float(value) => Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            SampleValue::String(value) => Value::String(value),
            SampleValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            SampleValue::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<&str> for SampleValue {
    fn from(value: &str) -> Self {
        SampleValue::String(value.to_string())
    }
}

impl Serialize for SampleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SampleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SampleValue::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

fn parse_path(path: &str) -> Result<Vec<PathSegment<'_>>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let (key, mut rest) = match part.find('[') {
            Some(idx) => (&part[..idx], &part[idx..]),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(PathSegment::Key(key));
        } else if rest.is_empty() {
            return Err(Error::InvalidPath(format!("empty segment in '{path}'")));
        }
        while !rest.is_empty() {
            let close = rest
                .find(']')
                .ok_or_else(|| Error::InvalidPath(format!("unclosed index in '{path}'")))?;
            let index = rest[1..close]
                .parse::<usize>()
                .map_err(|_| Error::InvalidPath(format!("non-numeric index in '{path}'")))?;
            segments.push(PathSegment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return Err(Error::InvalidPath(format!(
                    "unexpected '{rest}' after index in '{path}'"
                )));
            }
        }
    }
    Ok(segments)
}

/// Flatten a sampled record into addressable source fields.
///
/// Object keys become dotted segments. Nested objects emit their own path and
/// then their children. An array whose first element is an object emits the
/// array path and then the children of `path[0]`; any other array is a single
/// `array` field.
pub fn flatten_sample(sample: &SampleValue) -> Vec<SourceField> {
    let mut fields = Vec::new();
    match sample {
        SampleValue::Object(_) => flatten_into(sample, "", &mut fields),
        SampleValue::Array(items) => {
            if let Some(first @ SampleValue::Object(_)) = items.first() {
                flatten_into(first, "[0]", &mut fields);
            }
        }
        _ => {}
    }
    fields
}

fn flatten_into(value: &SampleValue, prefix: &str, fields: &mut Vec<SourceField>) {
    let SampleValue::Object(entries) = value else {
        return;
    };

    for (key, child) in entries {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        fields.push(SourceField::from_sample(path.clone(), child.clone()));
        match child {
            SampleValue::Object(_) => flatten_into(child, &path, fields),
            SampleValue::Array(items) => {
                if let Some(first @ SampleValue::Object(_)) = items.first() {
                    flatten_into(first, &format!("{path}[0]"), fields);
                }
            }
            _ => {}
        }
    }
}

/// Display hint for string samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringSubtype {
    DateString,
    Email,
    NumericString,
    Plain,
}

impl StringSubtype {
    pub fn as_str(self) -> &'static str {
        match self {
            StringSubtype::DateString => "date-string",
            StringSubtype::Email => "email",
            StringSubtype::NumericString => "numeric-string",
            StringSubtype::Plain => "plain",
        }
    }
}

/// Classify what a string sample looks like. Hint only; never changes typing.
pub fn detect_string_subtype(value: &str) -> StringSubtype {
    let patterns = subtype_patterns();
    if let Some(patterns) = patterns {
        if patterns.dates.iter().any(|re| re.is_match(value)) {
            return StringSubtype::DateString;
        }
        if patterns.email.is_match(value) {
            return StringSubtype::Email;
        }
    }
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.parse::<f64>().is_ok_and(|number| number.is_finite()) {
        return StringSubtype::NumericString;
    }
    StringSubtype::Plain
}

struct SubtypePatterns {
    dates: Vec<Regex>,
    email: Regex,
}

fn subtype_patterns() -> Option<&'static SubtypePatterns> {
    static PATTERNS: OnceLock<Option<SubtypePatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            let dates = [
                r"^\d{4}-\d{2}-\d{2}$",
                r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}",
                r"^\d{2}/\d{2}/\d{4}$",
            ]
            .into_iter()
            .map(Regex::new)
            .collect::<std::result::Result<Vec<_>, _>>()
            .ok()?;
            let email = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok()?;
            Some(SubtypePatterns { dates, email })
        })
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_dotted_and_indexed_paths() {
        let segments = parse_path("orders[0].items[2].sku").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Key("orders"),
                PathSegment::Index(0),
                PathSegment::Key("items"),
                PathSegment::Index(2),
                PathSegment::Key("sku"),
            ]
        );
        assert!(parse_path("a..b").is_err());
        assert!(parse_path("a[x]").is_err());
        assert!(parse_path("a[0").is_err());
    }

    #[test]
    fn numbers_keep_integer_vs_float() {
        let value = SampleValue::from(json!({"n": 3, "x": 3.5}));
        assert_eq!(value.get("n"), Some(&SampleValue::Integer(3)));
        assert_eq!(value.get("x"), Some(&SampleValue::Float(3.5)));
    }

    #[test]
    fn string_subtypes_follow_sample_shape() {
        assert_eq!(detect_string_subtype("2024-01-31"), StringSubtype::DateString);
        assert_eq!(detect_string_subtype("a@b.io"), StringSubtype::Email);
        assert_eq!(detect_string_subtype("19.99"), StringSubtype::NumericString);
        assert_eq!(detect_string_subtype("hello"), StringSubtype::Plain);
    }
}

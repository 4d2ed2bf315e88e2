use fieldmap_core::{CanonicalType, SampleValue};
use serde_json::Value;

use super::{Builtin, STRING, text_of, truthy_text};
use crate::catalog::{Transform, TransformCategory, TransformOutput};
use crate::errors::EvaluationError;

pub(super) fn transforms() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(Builtin::new(
            "to_string",
            "To String/Varchar",
            "Convert to text/varchar",
            TransformCategory::Conversion,
            STRING,
            |value| Ok(SampleValue::String(text_of(&value))),
        )),
        Box::new(Builtin::new(
            "parse_int",
            "To Integer",
            "Convert to integer",
            TransformCategory::Conversion,
            TransformOutput::Fixed(CanonicalType::Integer),
            parse_int,
        )),
        Box::new(Builtin::new(
            "parse_float",
            "To Float/Decimal",
            "Convert to decimal",
            TransformCategory::Conversion,
            TransformOutput::Fixed(CanonicalType::Float),
            parse_float,
        )),
        Box::new(Builtin::new(
            "parse_bool",
            "To Boolean",
            "Convert to true/false",
            TransformCategory::Conversion,
            TransformOutput::Fixed(CanonicalType::Boolean),
            |value| Ok(SampleValue::Bool(truthy(&value))),
        )),
        Box::new(Builtin::new(
            "json_stringify",
            "To JSON String",
            "Convert object to JSON string",
            TransformCategory::Conversion,
            STRING,
            |value| match value {
                SampleValue::String(text) => Ok(SampleValue::String(text)),
                other => Ok(SampleValue::String(other.to_json_string())),
            },
        )),
        Box::new(Builtin::new(
            "json_parse",
            "Parse JSON",
            "Parse JSON string to object",
            TransformCategory::Conversion,
            TransformOutput::Fixed(CanonicalType::Object),
            json_parse,
        )),
    ]
}

fn parse_int(value: SampleValue) -> Result<SampleValue, EvaluationError> {
    match value {
        SampleValue::Integer(number) => Ok(SampleValue::Integer(number)),
        SampleValue::Float(number) => {
            let truncated = number.trunc();
            if truncated.is_finite()
                && truncated >= i64::MIN as f64
                && truncated < i64::MAX as f64
            {
                Ok(SampleValue::Integer(truncated as i64))
            } else {
                Err(EvaluationError::OutOfRange(number.to_string()))
            }
        }
        SampleValue::Bool(flag) => Ok(SampleValue::Integer(i64::from(flag))),
        SampleValue::Null => Ok(SampleValue::Integer(0)),
        SampleValue::String(text) => match first_signed_integer(&text) {
            Some(digits) => digits
                .parse::<i64>()
                .map(SampleValue::Integer)
                .map_err(|_| EvaluationError::OutOfRange(digits.to_string())),
            None => Ok(SampleValue::Integer(0)),
        },
        other => Err(EvaluationError::Unsupported(other.type_label())),
    }
}

/// First run of digits in `text`, with its leading minus sign when present.
fn first_signed_integer(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let end = bytes[start..]
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset);
    let start = if start > 0 && bytes[start - 1] == b'-' {
        start - 1
    } else {
        start
    };
    Some(&text[start..end])
}

fn parse_float(value: SampleValue) -> Result<SampleValue, EvaluationError> {
    match value {
        SampleValue::Integer(number) => Ok(SampleValue::Float(number as f64)),
        SampleValue::Float(number) => Ok(SampleValue::Float(number)),
        SampleValue::Bool(flag) => Ok(SampleValue::Float(if flag { 1.0 } else { 0.0 })),
        SampleValue::Null => Ok(SampleValue::Float(0.0)),
        SampleValue::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
                .collect();
            Ok(SampleValue::Float(cleaned.parse::<f64>().unwrap_or(0.0)))
        }
        other => Err(EvaluationError::Unsupported(other.type_label())),
    }
}

fn truthy(value: &SampleValue) -> bool {
    match value {
        SampleValue::Null => false,
        SampleValue::Bool(flag) => *flag,
        SampleValue::Integer(number) => *number != 0,
        SampleValue::Float(number) => *number != 0.0,
        SampleValue::String(text) => truthy_text(text),
        SampleValue::Array(items) => !items.is_empty(),
        SampleValue::Object(entries) => !entries.is_empty(),
    }
}

fn json_parse(value: SampleValue) -> Result<SampleValue, EvaluationError> {
    match value {
        SampleValue::String(text) => serde_json::from_str::<Value>(&text)
            .map(SampleValue::from)
            .map_err(|err| EvaluationError::InvalidJson(err.to_string())),
        other => Ok(other),
    }
}

pub(super) fn bit(value: SampleValue) -> Result<SampleValue, EvaluationError> {
    Ok(SampleValue::Integer(i64::from(truthy(&value))))
}

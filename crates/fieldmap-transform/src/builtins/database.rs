use std::borrow::Cow;

use fieldmap_core::{CanonicalType, SampleValue};

use super::convert::bit;
use super::{Builtin, STRING, is_blank, map_text, text_of};
use crate::catalog::{Transform, TransformCategory, TransformOutput};
use crate::errors::EvaluationError;

pub(super) fn transforms() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(Builtin::new(
            "escape_sql",
            "Escape SQL",
            "Escape SQL special characters",
            TransformCategory::Database,
            STRING,
            |value| map_text(value, |text| text.replace('\'', "''")),
        )),
        Box::new(Builtin::new(
            "null_to_empty",
            "Null to Empty String",
            "Convert null to empty string",
            TransformCategory::Database,
            TransformOutput::PassThrough,
            |value| match value {
                SampleValue::Null => Ok(SampleValue::String(String::new())),
                other => Ok(other),
            },
        )),
        Box::new(Builtin::new(
            "empty_to_null",
            "Empty to Null",
            "Convert empty string to null",
            TransformCategory::Database,
            TransformOutput::PassThrough,
            |value| match value {
                SampleValue::String(text) if text.trim().is_empty() => Ok(SampleValue::Null),
                other => Ok(other),
            },
        )),
        Box::new(DefaultIfEmpty::new(
            "default_if_empty",
            SampleValue::String(String::new()),
        )),
        Box::new(Builtin::new(
            "boolean_to_bit",
            "Boolean to Bit",
            "Convert true/false to 1/0",
            TransformCategory::Database,
            TransformOutput::Fixed(CanonicalType::Integer),
            bit,
        )),
        Box::new(Builtin::new(
            "normalize_phone",
            "Normalize Phone",
            "Format phone number",
            TransformCategory::Validation,
            STRING,
            |value| map_text(value, |text| normalize_phone(text).into_owned()),
        )),
        Box::new(Builtin::new(
            "normalize_email",
            "Normalize Email",
            "Lowercase and trim email",
            TransformCategory::Validation,
            STRING,
            |value| Ok(SampleValue::String(text_of(&value).trim().to_lowercase())),
        )),
    ]
}

/// Replaces null or blank values with a fixed default; other values pass through.
pub struct DefaultIfEmpty {
    id: String,
    description: String,
    default: SampleValue,
}

impl DefaultIfEmpty {
    pub fn new(id: impl Into<String>, default: SampleValue) -> Self {
        let description = match &default {
            SampleValue::String(text) if text.is_empty() => {
                "Replace null or blank values with an empty default".to_string()
            }
            other => format!("Replace null or blank values with {other}"),
        };
        Self {
            id: id.into(),
            description,
            default,
        }
    }

    pub fn default_value(&self) -> &SampleValue {
        &self.default
    }
}

impl Transform for DefaultIfEmpty {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        "Default if Empty"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> TransformCategory {
        TransformCategory::Database
    }

    fn output(&self) -> TransformOutput {
        TransformOutput::PassThrough
    }

    fn apply(&self, input: SampleValue) -> Result<SampleValue, EvaluationError> {
        if is_blank(&input) {
            Ok(self.default.clone())
        } else {
            Ok(input)
        }
    }
}

fn normalize_phone(text: &str) -> Cow<'_, str> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        Cow::Owned(format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]))
    } else if digits == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(digits)
    }
}

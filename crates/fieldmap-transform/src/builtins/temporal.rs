use chrono::{DateTime, NaiveDate, NaiveDateTime};
use fieldmap_core::{CanonicalType, SampleValue};

use super::{Builtin, STRING, is_blank, text_of};
use crate::catalog::{Transform, TransformCategory, TransformOutput};
use crate::errors::EvaluationError;

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%m-%d-%Y",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

pub(super) fn transforms() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(Builtin::new(
            "parse_date",
            "Parse Date",
            "Parse as date (YYYY-MM-DD)",
            TransformCategory::Datetime,
            TransformOutput::Fixed(CanonicalType::Date),
            |value| {
                if is_blank(&value) {
                    return Ok(SampleValue::Null);
                }
                let date = require_date(&value)?;
                Ok(SampleValue::String(date.format("%Y-%m-%d").to_string()))
            },
        )),
        Box::new(Builtin::new(
            "parse_datetime",
            "Parse DateTime",
            "Parse as datetime",
            TransformCategory::Datetime,
            TransformOutput::Fixed(CanonicalType::Datetime),
            |value| {
                if is_blank(&value) {
                    return Ok(SampleValue::Null);
                }
                let text = text_of(&value);
                let datetime = parse_datetime(&text)
                    .or_else(|| parse_date(&text).and_then(|date| date.and_hms_opt(0, 0, 0)))
                    .ok_or(EvaluationError::InvalidDatetime(text))?;
                Ok(SampleValue::String(datetime.format(ISO_DATETIME).to_string()))
            },
        )),
        Box::new(Builtin::new(
            "to_timestamp",
            "To Timestamp",
            "Convert to Unix timestamp",
            TransformCategory::Datetime,
            TransformOutput::Fixed(CanonicalType::Float),
            to_timestamp,
        )),
        Box::new(Builtin::new(
            "format_date_us",
            "Format Date (US)",
            "Format as MM/DD/YYYY",
            TransformCategory::Datetime,
            STRING,
            |value| Ok(SampleValue::String(require_date(&value)?.format("%m/%d/%Y").to_string())),
        )),
        Box::new(Builtin::new(
            "format_date_iso",
            "Format Date (ISO)",
            "Format as YYYY-MM-DD",
            TransformCategory::Datetime,
            STRING,
            |value| Ok(SampleValue::String(require_date(&value)?.format("%Y-%m-%d").to_string())),
        )),
    ]
}

/// Calendar date from any accepted date or datetime spelling.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| parse_datetime(text).map(|datetime| datetime.date()))
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn require_date(value: &SampleValue) -> Result<NaiveDate, EvaluationError> {
    let text = text_of(value);
    parse_date(&text).ok_or(EvaluationError::InvalidDate(text))
}

fn to_timestamp(value: SampleValue) -> Result<SampleValue, EvaluationError> {
    match value {
        SampleValue::Null => Ok(SampleValue::Float(0.0)),
        SampleValue::Integer(seconds) => Ok(SampleValue::Float(seconds as f64)),
        SampleValue::Float(seconds) => Ok(SampleValue::Float(seconds)),
        other => {
            let text = text_of(&other);
            let datetime = parse_datetime(&text)
                .or_else(|| parse_date(&text).and_then(|date| date.and_hms_opt(0, 0, 0)))
                .ok_or(EvaluationError::InvalidDate(text))?;
            Ok(SampleValue::Float(datetime.and_utc().timestamp() as f64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_listed_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 25);
        for text in ["2024-03-25", "03/25/2024", "25/03/2024", "2024/03/25", "25-03-2024"] {
            assert_eq!(parse_date(text), expected, "{text}");
        }
        assert_eq!(parse_date("2024-03-25T10:30:00Z"), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn month_first_wins_when_ambiguous() {
        assert_eq!(parse_date("03/04/2024"), NaiveDate::from_ymd_opt(2024, 3, 4));
    }

    #[test]
    fn rfc3339_is_normalized_to_utc() {
        let datetime = parse_datetime("2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(datetime.format(ISO_DATETIME).to_string(), "2024-01-01T00:00:00");
    }

    #[test]
    fn timestamps_are_utc_seconds() {
        let out = to_timestamp(SampleValue::from("2024-01-01")).unwrap();
        assert_eq!(out, SampleValue::Float(1_704_067_200.0));
        assert!(to_timestamp(SampleValue::from("soon")).is_err());
    }
}

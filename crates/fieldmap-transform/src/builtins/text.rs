use std::sync::OnceLock;

use fieldmap_core::SampleValue;
use regex::Regex;

use super::{Builtin, STRING, map_text, text_of};
use crate::catalog::{Transform, TransformCategory, TransformOutput};
use crate::errors::EvaluationError;

pub(super) fn transforms() -> Vec<Box<dyn Transform>> {
    let mut transforms: Vec<Box<dyn Transform>> = [CaseMode::Lower, CaseMode::Upper]
        .into_iter()
        .map(|mode| Box::new(CaseTransform::new(mode)) as Box<dyn Transform>)
        .collect();

    transforms.push(Box::new(Builtin::new(
        "trim",
        "Trim",
        "Remove whitespace",
        TransformCategory::String,
        STRING,
        |value| map_text(value, |text| text.trim().to_string()),
    )));

    for mode in [
        CaseMode::Capitalize,
        CaseMode::Title,
        CaseMode::Snake,
        CaseMode::Camel,
    ] {
        transforms.push(Box::new(CaseTransform::new(mode)));
    }

    transforms.push(Box::new(Builtin::new(
        "remove_special_chars",
        "Remove Special Chars",
        "Keep only alphanumeric",
        TransformCategory::String,
        STRING,
        |value| {
            map_text(value, |text| {
                text.chars()
                    .filter(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace())
                    .collect()
            })
        },
    )));
    transforms.push(Box::new(TruncateTransform::new(50)));
    transforms.push(Box::new(TruncateTransform::new(255)));
    transforms.push(Box::new(Builtin::new(
        "remove_spaces",
        "Remove Spaces",
        "Remove all spaces",
        TransformCategory::String,
        STRING,
        |value| map_text(value, |text| text.replace(' ', "")),
    )));
    transforms.push(Box::new(Builtin::new(
        "extract_numbers",
        "Extract Numbers",
        "Keep only digits",
        TransformCategory::String,
        STRING,
        |value| map_text(value, |text| text.chars().filter(char::is_ascii_digit).collect()),
    )));
    transforms.push(Box::new(Builtin::new(
        "extract_email",
        "Extract Email",
        "Pull the first email address out of the text",
        TransformCategory::String,
        STRING,
        extract_email,
    )));
    transforms
}

/// Casing conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Lower,
    Upper,
    Capitalize,
    Title,
    Snake,
    Camel,
}

pub struct CaseTransform {
    mode: CaseMode,
}

impl CaseTransform {
    pub fn new(mode: CaseMode) -> Self {
        Self { mode }
    }
}

impl Transform for CaseTransform {
    fn id(&self) -> &str {
        match self.mode {
            CaseMode::Lower => "lowercase",
            CaseMode::Upper => "uppercase",
            CaseMode::Capitalize => "capitalize",
            CaseMode::Title => "title_case",
            CaseMode::Snake => "snake_case",
            CaseMode::Camel => "camel_case",
        }
    }

    fn label(&self) -> &str {
        match self.mode {
            CaseMode::Lower => "Lowercase",
            CaseMode::Upper => "Uppercase",
            CaseMode::Capitalize => "Capitalize",
            CaseMode::Title => "Title Case",
            CaseMode::Snake => "Snake Case",
            CaseMode::Camel => "Camel Case",
        }
    }

    fn description(&self) -> &str {
        match self.mode {
            CaseMode::Lower => "Convert to lowercase",
            CaseMode::Upper => "Convert to uppercase",
            CaseMode::Capitalize => "Capitalize first letter",
            CaseMode::Title => "Title case text",
            CaseMode::Snake => "Convert to snake_case",
            CaseMode::Camel => "Convert to camelCase",
        }
    }

    fn category(&self) -> TransformCategory {
        TransformCategory::String
    }

    fn output(&self) -> TransformOutput {
        STRING
    }

    fn apply(&self, input: SampleValue) -> Result<SampleValue, EvaluationError> {
        map_text(input, |text| match self.mode {
            CaseMode::Lower => text.to_lowercase(),
            CaseMode::Upper => text.to_uppercase(),
            CaseMode::Capitalize => capitalize(text),
            CaseMode::Title => title_case(text),
            CaseMode::Snake => snake_case(text),
            CaseMode::Camel => camel_case(text),
        })
    }
}

/// Keep at most `max_len` characters.
pub struct TruncateTransform {
    id: String,
    label: String,
    description: String,
    max_len: usize,
}

impl TruncateTransform {
    pub fn new(max_len: usize) -> Self {
        Self {
            id: format!("truncate_{max_len}"),
            label: format!("Truncate ({max_len} chars)"),
            description: format!("Limit to {max_len} characters"),
            max_len,
        }
    }
}

impl Transform for TruncateTransform {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> TransformCategory {
        TransformCategory::String
    }

    fn output(&self) -> TransformOutput {
        STRING
    }

    fn apply(&self, input: SampleValue) -> Result<SampleValue, EvaluationError> {
        map_text(input, |text| text.chars().take(self.max_len).collect())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out: String = first.to_uppercase().collect();
    out.push_str(&chars.as_str().to_lowercase());
    out
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            word_start = true;
            out.push(ch);
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn snake_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (idx, &ch) in chars.iter().enumerate() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if ch.is_uppercase() {
            let prev = idx.checked_sub(1).map(|prev| chars[prev]);
            let next = chars.get(idx + 1).copied();
            let boundary = match prev {
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn camel_case(text: &str) -> String {
    let normalized = text.replace('_', " ");
    let mut words = normalized.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = first.to_lowercase();
    for word in words {
        out.push_str(&capitalize(word));
    }
    out
}

fn extract_email(value: SampleValue) -> Result<SampleValue, EvaluationError> {
    let text = text_of(&value);
    let found = email_pattern()
        .and_then(|re| re.find(&text))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Ok(SampleValue::String(found))
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").ok())
        .as_ref()
}

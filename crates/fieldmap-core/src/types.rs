use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Semantic category every source and target type vocabulary normalizes into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Datetime,
    Object,
    Array,
    Unknown,
}

impl CanonicalType {
    /// Every canonical type, in declaration order.
    pub const ALL: [CanonicalType; 9] = [
        CanonicalType::String,
        CanonicalType::Integer,
        CanonicalType::Float,
        CanonicalType::Boolean,
        CanonicalType::Date,
        CanonicalType::Datetime,
        CanonicalType::Object,
        CanonicalType::Array,
        CanonicalType::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalType::String => "string",
            CanonicalType::Integer => "integer",
            CanonicalType::Float => "float",
            CanonicalType::Boolean => "boolean",
            CanonicalType::Date => "date",
            CanonicalType::Datetime => "datetime",
            CanonicalType::Object => "object",
            CanonicalType::Array => "array",
            CanonicalType::Unknown => "unknown",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, CanonicalType::Integer | CanonicalType::Float)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, CanonicalType::Date | CanonicalType::Datetime)
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CanonicalType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::InvalidLabel(format!("unknown canonical type '{value}'")))
    }
}

/// System a raw type label was reported by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OriginSystem {
    /// Runtime-reflected JSON value types of a sampled API response.
    Json,
    /// Relational column types (Postgres, MySQL, SQL Server dialects).
    Sql,
    /// Document-store field types.
    Document,
}

impl fmt::Display for OriginSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OriginSystem::Json => "json",
            OriginSystem::Sql => "sql",
            OriginSystem::Document => "document",
        };
        f.write_str(label)
    }
}

impl FromStr for OriginSystem {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "api" => Ok(OriginSystem::Json),
            "sql" | "relational" | "postgres" | "postgresql" | "mysql" | "mssql" => {
                Ok(OriginSystem::Sql)
            }
            "document" | "mongodb" | "mongo" => Ok(OriginSystem::Document),
            other => Err(Error::InvalidLabel(format!("unknown origin system '{other}'"))),
        }
    }
}

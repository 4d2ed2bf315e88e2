use fieldmap_core::{CanonicalType, OriginSystem, canonicalize, resolve};

fn sql(raw: &str) -> CanonicalType {
    canonicalize(raw, OriginSystem::Sql)
}

#[test]
fn sql_families_ignore_case_and_suffixes() {
    for raw in [
        "INT",
        "integer",
        "BigInt",
        "smallint",
        "serial",
        "int(11)",
        "int4",
        "bigserial",
        "int(10) unsigned",
    ] {
        assert_eq!(sql(raw), CanonicalType::Integer, "{raw}");
    }
    for raw in [
        "float",
        "DOUBLE",
        "decimal(12,4)",
        "numeric(10,2)",
        "real",
        "money",
        "double precision",
    ] {
        assert_eq!(sql(raw), CanonicalType::Float, "{raw}");
    }
    for raw in [
        "varchar(255)",
        "TEXT",
        "char(2)",
        "nvarchar(max)",
        "ntext",
        "longtext",
        "character varying(40)",
        "uuid",
    ] {
        assert_eq!(sql(raw), CanonicalType::String, "{raw}");
    }
    for raw in [
        "bool",
        "BOOLEAN",
        "bit",
        "BIT(1)",
        "bit(8)",
        "tinyint(1)",
        "TINYINT( 1 )",
        "tinyint(1) unsigned",
    ] {
        assert_eq!(sql(raw), CanonicalType::Boolean, "{raw}");
    }
    assert_eq!(sql("DATE"), CanonicalType::Date);
    for raw in [
        "datetime",
        "timestamp",
        "timestamptz",
        "timestamp with time zone",
        "TIMESTAMP(6) WITHOUT TIME ZONE",
        "datetime2",
    ] {
        assert_eq!(sql(raw), CanonicalType::Datetime, "{raw}");
    }
    assert_eq!(sql("json"), CanonicalType::Object);
    assert_eq!(sql("JSONB"), CanonicalType::Object);
}

#[test]
fn json_runtime_types_map_directly() {
    let json = |raw| canonicalize(raw, OriginSystem::Json);
    assert_eq!(json("string"), CanonicalType::String);
    assert_eq!(json("number"), CanonicalType::Float);
    assert_eq!(json("boolean"), CanonicalType::Boolean);
    assert_eq!(json("object"), CanonicalType::Object);
    assert_eq!(json("array"), CanonicalType::Array);
    assert_eq!(json("null"), CanonicalType::Unknown);
}

#[test]
fn document_vocabulary_is_normalized() {
    let doc = |raw| canonicalize(raw, OriginSystem::Document);
    assert_eq!(doc("ObjectId"), CanonicalType::String);
    assert_eq!(doc("str"), CanonicalType::String);
    assert_eq!(doc("int"), CanonicalType::Integer);
    assert_eq!(doc("double"), CanonicalType::Float);
    assert_eq!(doc("decimal"), CanonicalType::Float);
    assert_eq!(doc("bool"), CanonicalType::Boolean);
    assert_eq!(doc("datetime"), CanonicalType::Datetime);
    assert_eq!(doc("date"), CanonicalType::Date);
    assert_eq!(doc("array"), CanonicalType::Array);
    assert_eq!(doc("array[dict]"), CanonicalType::Array);
    assert_eq!(doc("dict"), CanonicalType::Object);
    assert_eq!(doc("object"), CanonicalType::Object);
}

#[test]
fn unknown_labels_never_fail() {
    for origin in [OriginSystem::Json, OriginSystem::Sql, OriginSystem::Document] {
        for raw in ["", "   ", "geometry", "varchar(", "(((", "tsvector", "\u{1F600}"] {
            assert_eq!(canonicalize(raw, origin), CanonicalType::Unknown, "{origin}: {raw:?}");
        }
    }
}

#[test]
fn canonicalize_is_deterministic() {
    for raw in ["numeric(10,2)", "ObjectId", "tinyint(1)", "mystery"] {
        for origin in [OriginSystem::Json, OriginSystem::Sql, OriginSystem::Document] {
            assert_eq!(canonicalize(raw, origin), canonicalize(raw, origin));
        }
    }
}

#[test]
fn resolver_matches_documented_outcomes() {
    let same = resolve(CanonicalType::String, CanonicalType::String);
    assert!(same.compatible && !same.conversion_needed && same.warning.is_none());

    let needs = resolve(CanonicalType::String, CanonicalType::Integer);
    assert!(needs.compatible && needs.conversion_needed);
    assert!(needs.warning.as_deref().unwrap_or_default().contains("parse_int"));

    let no = resolve(CanonicalType::Object, CanonicalType::Integer);
    assert!(!no.compatible);
    assert_eq!(no.warning.as_deref(), Some("Cannot convert object to integer"));

    let widen = resolve(CanonicalType::Integer, CanonicalType::Float);
    assert!(widen.compatible && !widen.conversion_needed);
    let narrow = resolve(CanonicalType::Float, CanonicalType::Integer);
    assert!(narrow.compatible && !narrow.conversion_needed);

    let docs = resolve(CanonicalType::Array, CanonicalType::Object);
    assert!(docs.compatible && !docs.conversion_needed);

    let json = resolve(CanonicalType::String, CanonicalType::Array);
    assert!(json.conversion_needed);
    assert!(json.warning.as_deref().unwrap_or_default().contains("json_parse"));

    let stringify = resolve(CanonicalType::Object, CanonicalType::String);
    assert!(stringify.warning.as_deref().unwrap_or_default().contains("json_stringify"));

    let to_string = resolve(CanonicalType::Boolean, CanonicalType::String);
    assert!(to_string.warning.as_deref().unwrap_or_default().contains("to_string"));

    let date = resolve(CanonicalType::String, CanonicalType::Datetime);
    assert!(date.warning.as_deref().unwrap_or_default().contains("parse_datetime"));
}

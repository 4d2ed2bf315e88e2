use fieldmap_core::{CanonicalType, SampleValue};
use fieldmap_transform::{
    ArithmeticOp, ArithmeticTransform, DefaultIfEmpty, EvaluationError, SimulationError,
    TransformCatalog,
};
use serde_json::json;

fn sample(value: serde_json::Value) -> SampleValue {
    SampleValue::from(value)
}

#[test]
fn price_string_becomes_a_float() {
    let catalog = TransformCatalog::builtin();
    let preview = catalog.preview(CanonicalType::String, &["parse_float"], &sample(json!("19.99")));

    assert_eq!(preview.declared_type, Some(CanonicalType::Float));
    assert_eq!(preview.outcome, Ok(SampleValue::Float(19.99)));
    assert_eq!(preview.display(), "19.99");
    assert_eq!(preview.observed_type(), Some(CanonicalType::Float));
}

#[test]
fn chain_order_is_respected() {
    let catalog = TransformCatalog::builtin();
    let value = catalog
        .simulate(&["parse_int", "to_string"], &sample(json!("  42 apples")))
        .expect("chain evaluates");
    assert_eq!(value, SampleValue::from("42"));

    let value = catalog
        .simulate(&["trim", "uppercase", "truncate_50"], &sample(json!("  hello  ")))
        .expect("chain evaluates");
    assert_eq!(value, SampleValue::from("HELLO"));
}

#[test]
fn null_input_renders_empty_for_string_transforms() {
    let catalog = TransformCatalog::builtin();
    for name in ["lowercase", "trim", "escape_sql", "normalize_email", "to_string"] {
        let value = catalog
            .simulate(&[name], &SampleValue::Null)
            .expect("null is accepted");
        assert_eq!(value, SampleValue::from(""), "{name}");
    }
}

#[test]
fn invalid_json_yields_an_error_marker_but_keeps_the_declared_type() {
    let catalog = TransformCatalog::builtin();
    let preview = catalog.preview(CanonicalType::String, &["json_parse"], &sample(json!("{oops")));

    assert_eq!(preview.declared_type, Some(CanonicalType::Object));
    assert!(!preview.is_ok());
    assert!(preview.display().starts_with("Error: "));
    assert!(matches!(
        preview.outcome,
        Err(SimulationError::Step {
            step: 0,
            source: EvaluationError::InvalidJson(_),
            ..
        })
    ));
}

#[test]
fn invalid_date_reports_the_failing_step() {
    let catalog = TransformCatalog::builtin();
    let err = catalog
        .simulate(&["trim", "parse_date"], &sample(json!("someday")))
        .unwrap_err();
    assert_eq!(
        err,
        SimulationError::Step {
            step: 1,
            transform: "parse_date".to_string(),
            source: EvaluationError::InvalidDate("someday".to_string()),
        }
    );
}

#[test]
fn dates_are_normalized_and_reformatted() {
    let catalog = TransformCatalog::builtin();
    let value = catalog
        .simulate(&["parse_date"], &sample(json!("12/31/2023")))
        .expect("us date parses");
    assert_eq!(value, SampleValue::from("2023-12-31"));

    let value = catalog
        .simulate(&["format_date_us"], &sample(json!("2023-12-31")))
        .expect("iso date parses");
    assert_eq!(value, SampleValue::from("12/31/2023"));

    let value = catalog
        .simulate(&["parse_datetime"], &sample(json!("2023-12-31 08:15:00")))
        .expect("datetime parses");
    assert_eq!(value, SampleValue::from("2023-12-31T08:15:00"));
}

#[test]
fn empty_dates_become_null() {
    let catalog = TransformCatalog::builtin();
    for name in ["parse_date", "parse_datetime"] {
        assert_eq!(catalog.simulate(&[name], &sample(json!(""))), Ok(SampleValue::Null));
    }
}

#[test]
fn unknown_transform_fails_simulation_and_static_typing() {
    let catalog = TransformCatalog::builtin();
    let preview = catalog.preview(CanonicalType::String, &["shout"], &sample(json!("x")));
    assert_eq!(preview.declared_type, None);
    assert_eq!(
        preview.outcome,
        Err(SimulationError::UnknownTransform("shout".to_string()))
    );
}

#[test]
fn database_helpers() {
    let catalog = TransformCatalog::builtin();
    assert_eq!(
        catalog.simulate(&["escape_sql"], &sample(json!("O'Brien"))),
        Ok(SampleValue::from("O''Brien"))
    );
    assert_eq!(
        catalog.simulate(&["empty_to_null"], &sample(json!("   "))),
        Ok(SampleValue::Null)
    );
    assert_eq!(
        catalog.simulate(&["null_to_empty"], &SampleValue::Null),
        Ok(SampleValue::from(""))
    );
    assert_eq!(
        catalog.simulate(&["boolean_to_bit"], &sample(json!("yes"))),
        Ok(SampleValue::Integer(1))
    );
    assert_eq!(
        catalog.simulate(&["normalize_phone"], &sample(json!("555-867-5309"))),
        Ok(SampleValue::from("(555) 867-5309"))
    );
    assert_eq!(
        catalog.simulate(&["extract_email"], &sample(json!("Contact: Ana <ANA@example.org>"))),
        Ok(SampleValue::from("ANA@example.org"))
    );
}

#[test]
fn structured_values_stringify_as_json() {
    let catalog = TransformCatalog::builtin();
    let value = catalog
        .simulate(&["json_stringify"], &sample(json!({"a": [1, 2]})))
        .expect("objects stringify");
    assert_eq!(value, SampleValue::from(r#"{"a":[1,2]}"#));
}

#[test]
fn registered_arithmetic_converts_prices_to_cents() {
    let mut catalog = TransformCatalog::with_builtins();
    catalog
        .register(Box::new(ArithmeticTransform::new(ArithmeticOp::Multiply, 100.0)))
        .expect("new id");
    catalog
        .register(Box::new(ArithmeticTransform::new(ArithmeticOp::Divide, 0.0)))
        .expect("new id");

    let preview = catalog.preview(
        CanonicalType::String,
        &["parse_float", "multiply_100", "parse_int"],
        &sample(json!("12.5")),
    );
    assert_eq!(preview.declared_type, Some(CanonicalType::Integer));
    assert_eq!(preview.outcome, Ok(SampleValue::Integer(1250)));

    assert_eq!(
        catalog.simulate(&["divide_0"], &sample(json!(42))),
        Ok(SampleValue::Float(0.0))
    );
    assert_eq!(
        catalog.compose_type(CanonicalType::String, &["add"]),
        Ok(CanonicalType::Float)
    );
}

#[test]
fn configured_default_fills_blank_values() {
    let mut catalog = TransformCatalog::with_builtins();
    catalog
        .register(Box::new(DefaultIfEmpty::new("default_unknown", SampleValue::from("n/a"))))
        .expect("new id");

    assert_eq!(
        catalog.simulate(&["trim", "default_unknown"], &sample(json!("   "))),
        Ok(SampleValue::from("n/a"))
    );
    assert_eq!(
        catalog.simulate(&["default_if_empty"], &sample(json!(null))),
        Ok(SampleValue::from(""))
    );
}

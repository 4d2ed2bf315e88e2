use fieldmap_core::{
    CanonicalType, FieldConstraint, SampleValue, TargetField, TargetSchema, flatten_sample,
};
use fieldmap_mapping::{
    MappingEditor, MappingKey, MappingUpdate, SetIssueCode, incompatible_mappings,
    validate_mapping,
};
use fieldmap_transform::TransformCatalog;
use serde_json::json;

fn orders_schema() -> TargetSchema {
    TargetSchema::relational(
        "orders",
        vec![
            TargetField::new("order_id", "bigint").with_constraint(FieldConstraint::PrimaryKey),
            TargetField::new("price", "numeric(10,2)"),
            TargetField::new("customer_email", "varchar(255)")
                .with_constraint(FieldConstraint::NotNull),
            TargetField::new("notes", "text"),
        ],
    )
}

fn orders_editor(catalog: &TransformCatalog) -> MappingEditor<'_> {
    let sample = SampleValue::from(json!({
        "id": 1001,
        "price": "19.99",
        "customer": {"email": "ANA@EXAMPLE.ORG ", "name": "Ana"},
        "items": [{"sku": "A-1", "qty": 2}]
    }));
    MappingEditor::new(catalog, orders_schema(), flatten_sample(&sample)).expect("valid schema")
}

#[test]
fn price_scenario_with_and_without_parse_float() {
    let catalog = TransformCatalog::builtin();
    let mut editor = orders_editor(catalog);
    let key = editor.create_mapping("price", "price").expect("create");

    let mapping = editor.mapping(&key).expect("mapped");
    assert_eq!(mapping.source_type(), CanonicalType::String);
    assert_eq!(mapping.target_type(), CanonicalType::Float);
    assert!(mapping.validation().compatible);
    assert!(mapping.validation().conversion_needed);
    assert!(
        mapping
            .validation()
            .warning
            .as_deref()
            .is_some_and(|warning| warning.contains("parse_float"))
    );

    editor.add_transform(&key, "parse_float").expect("known transform");
    let mapping = editor.mapping(&key).expect("mapped");
    let validation = mapping.validation();
    assert_eq!(validation.transformed_type, CanonicalType::Float);
    assert!(validation.compatible);
    assert!(!validation.conversion_needed);

    let preview = editor.preview(&key).expect("mapped");
    assert_eq!(preview.outcome, Ok(SampleValue::Float(19.99)));
}

#[test]
fn revalidation_is_idempotent() {
    let catalog = TransformCatalog::builtin();
    let mut editor = orders_editor(catalog);
    let key = editor.create_mapping("customer.email", "customer_email").expect("create");
    editor
        .update_mapping(
            &key,
            MappingUpdate::default().transformations(vec![
                "trim".to_string(),
                "normalize_email".to_string(),
            ]),
        )
        .expect("known transforms");

    let mapping = editor.mapping(&key).expect("mapped");
    let once = validate_mapping(catalog, &mapping).expect("known transforms");
    let twice = validate_mapping(catalog, &once).expect("known transforms");
    assert_eq!(once, mapping);
    assert_eq!(twice.validation(), mapping.validation());
}

#[test]
fn missing_not_null_column_is_reported_until_mapped() {
    let catalog = TransformCatalog::builtin();
    let mut editor = orders_editor(catalog);
    editor.create_mapping("id", "order_id").expect("create");

    let issues = editor.set_issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].code, SetIssueCode::RequiredFieldUnmapped);
    assert_eq!(issues[0].field, "customer_email");

    editor
        .create_mapping("customer.email", "customer_email")
        .expect("create");
    assert!(editor.set_issues().is_empty());

    let summary = editor.summary();
    assert_eq!(summary.required_total, 2);
    assert_eq!(summary.required_mapped, 2);
}

#[test]
fn undo_twice_then_redo_restores_the_second_state() {
    let catalog = TransformCatalog::builtin();
    let mut editor = orders_editor(catalog);
    editor.create_mapping("id", "order_id").expect("c1");
    editor.create_mapping("price", "price").expect("c2");
    let after_c2 = editor.mappings();
    editor.create_mapping("customer.name", "notes").expect("c3");

    editor.undo().expect("undo c3");
    editor.undo().expect("undo c2");
    let redone = editor.redo().expect("redo c2");
    assert_eq!(redone, after_c2);
    assert_eq!(editor.mappings(), after_c2);

    editor
        .delete_mapping(&MappingKey::new("id", "order_id"))
        .expect("delete");
    assert!(!editor.can_redo());
    assert!(editor.redo().is_none());
    assert!(editor.can_undo());
}

#[test]
fn incompatible_mappings_stay_in_the_set() {
    let catalog = TransformCatalog::builtin();
    let mut editor = orders_editor(catalog);
    let key = editor.create_mapping("customer", "order_id").expect("create");

    let mapping = editor.mapping(&key).expect("kept");
    assert!(!mapping.validation().compatible);
    assert_eq!(
        mapping.validation().warning.as_deref(),
        Some("Cannot convert object to integer")
    );
    assert_eq!(editor.summary().incompatible, 1);
    assert!(!editor.report().is_ok());

    let mappings = editor.mappings();
    let incompatible = incompatible_mappings(mappings.as_slice());
    assert_eq!(incompatible.len(), 1);
    assert_eq!(incompatible[0].key(), key);
    assert_eq!(editor.incompatible_mappings().len(), 1);
    assert_eq!(editor.incompatible_mappings()[0].key(), key);
}

#[test]
fn failed_preview_keeps_the_optimistic_type() {
    let catalog = TransformCatalog::builtin();
    let mut editor = orders_editor(catalog);
    let key = editor.create_mapping("customer.name", "notes").expect("create");
    editor.add_transform(&key, "parse_date").expect("known");
    editor.add_transform(&key, "to_string").expect("known");

    let preview = editor.preview(&key).expect("mapped");
    assert!(preview.display().starts_with("Error: "));
    assert_eq!(preview.declared_type, Some(CanonicalType::String));
    assert!(editor.mapping(&key).expect("mapped").validation().is_direct());
}

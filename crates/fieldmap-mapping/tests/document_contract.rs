use fieldmap_mapping::{
    AutoMapOptions, EditCommand, MappingEditor, MappingError, MappingKey, load_document,
    mapping_document_json_schema, validate_document_json,
};
use fieldmap_transform::TransformCatalog;
use serde_json::json;
use std::fs;
use std::path::Path;

fn load_json(path: &Path) -> serde_json::Value {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|_| panic!("missing json at {}", path.display()));
    serde_json::from_str(&contents).expect("parse json")
}

fn document() -> serde_json::Value {
    json!({
        "target": {
            "kind": "document",
            "name": "users",
            "fields": [
                {"name": "_id", "type": "ObjectId", "required": true},
                {"name": "email", "type": "str", "required": true},
                {"name": "signup", "type": "datetime"},
                {"name": "age", "type": "int"}
            ]
        },
        "sample": {
            "user": {"id": "65f0c2a9e4b0a1b2c3d4e5f6", "email": " Bob@Example.com"},
            "created": "2024-02-01 10:00:00",
            "age": "42"
        },
        "suggestions": [
            {"source_path": "user.id", "target_name": "_id", "confidence_percent": 97},
            {"source_path": "user.email", "target_name": "email", "confidence_percent": 91},
            {"source_path": "age", "target_name": "age", "confidence_percent": 80}
        ],
        "mappings": [
            {
                "source_path": "user.email",
                "target_name": "email",
                "transformations": ["normalize_email"]
            },
            {
                "source_path": "created",
                "target_name": "signup",
                "transformations": ["parse_datetime"]
            }
        ]
    })
}

#[test]
fn schema_is_an_object_with_required_sections() {
    let schema = serde_json::to_value(mapping_document_json_schema()).expect("serialize schema");
    let required = schema["required"].as_array().expect("required list");
    assert!(required.contains(&json!("target")));
    assert!(required.contains(&json!("sample")));
}

#[test]
fn structural_errors_carry_json_pointers() {
    let mut broken = document();
    broken["target"]["fields"][0]
        .as_object_mut()
        .expect("field object")
        .remove("name");
    let report = validate_document_json(&broken).expect("schema compiles");
    assert!(!report.is_ok());
    assert!(
        report
            .errors
            .iter()
            .any(|issue| issue.path == "/target/fields/0")
    );

    let err = load_document(&broken).unwrap_err();
    assert!(matches!(err, MappingError::InvalidDocument(_)));
}

#[test]
fn document_loads_into_an_editor() {
    let catalog = TransformCatalog::builtin();
    let document = load_document(&document()).expect("valid document");
    let editor = MappingEditor::from_document(catalog, document, AutoMapOptions::default())
        .expect("loads");

    let commands: Vec<EditCommand> = editor
        .history()
        .iter()
        .map(|snapshot| snapshot.command)
        .collect();
    assert_eq!(
        commands,
        [
            EditCommand::Initial,
            EditCommand::AutoMap,
            EditCommand::UpdateMapping,
            EditCommand::CreateMapping,
        ]
    );

    let mappings = editor.mappings();
    assert_eq!(mappings.len(), 3);
    assert!(!mappings.contains(&MappingKey::new("age", "age")));

    let id = editor
        .mapping(&MappingKey::new("user.id", "_id"))
        .expect("auto-mapped");
    assert!(id.validation().is_direct());
    assert!(id.target_caveat().is_some());

    let email = editor
        .mapping(&MappingKey::new("user.email", "email"))
        .expect("auto-mapped");
    assert_eq!(email.transformations(), ["normalize_email".to_string()]);
    let preview = editor
        .preview(&MappingKey::new("user.email", "email"))
        .expect("mapped");
    assert_eq!(preview.display(), "bob@example.com");

    assert!(editor.set_issues().is_empty());
}

#[test]
fn unknown_transform_in_document_is_rejected() {
    let catalog = TransformCatalog::builtin();
    let mut raw = document();
    raw["mappings"][1]["transformations"] = json!(["parse_moon"]);
    let document = load_document(&raw).expect("structurally valid");
    let err = MappingEditor::from_document(catalog, document, AutoMapOptions::default())
        .unwrap_err();
    assert!(matches!(err, MappingError::Catalog(_)));
}

#[test]
fn demo_orders_document_maps_cleanly() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/orders.mapping.json");
    let raw = load_json(&path);

    let structural = validate_document_json(&raw).expect("schema compiles");
    assert!(structural.errors.is_empty(), "structural errors: {:?}", structural.errors);

    let catalog = TransformCatalog::builtin();
    let document = load_document(&raw).expect("valid document");
    let editor = MappingEditor::from_document(catalog, document, AutoMapOptions::default())
        .expect("loads");

    let summary = editor.summary();
    assert_eq!(summary.total, 6);
    assert_eq!(summary.compatible, 6);
    assert_eq!(summary.required_mapped, summary.required_total);
    assert!(editor.set_issues().is_empty());
    assert_eq!(editor.history().len(), 7);

    let price = editor
        .preview(&MappingKey::new("price", "price"))
        .expect("mapped");
    assert_eq!(price.display(), "19.99");
}

//! Golden Tests for Validation and Repair
//!
//! End-to-end runs over the YAML fixtures in `tests/fixtures`.

use std::path::{Path, PathBuf};

use linkml_slot_repair::{
    ancestors_of, auto_repair, effective_slots, validate, Checksum, ErrorKind, InheritanceGraph,
    Schema,
};

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> Schema {
    Schema::from_path(&fixtures_path().join(name)).unwrap()
}

fn found(schema: &Schema) -> Vec<(ErrorKind, String, String)> {
    validate(schema)
        .into_iter()
        .map(|e| (e.kind, e.class_name, e.slot_or_enum_name))
        .collect()
}

fn entry(kind: ErrorKind, class_name: &str, target: &str) -> (ErrorKind, String, String) {
    (kind, class_name.to_string(), target.to_string())
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_scenario_single_undefined_slot() {
    let schema = fixture("scenario_a.yaml");
    assert_eq!(
        found(&schema),
        vec![entry(ErrorKind::UndefinedSlot, "TestClass", "id")]
    );
}

#[test]
fn test_valid_schema_has_no_errors() {
    let schema = fixture("person.yaml");
    let report = validate(&schema);
    assert!(report.is_valid(), "unexpected errors:\n{}", report);
}

#[test]
fn test_mixin_attributes_are_effective() {
    let schema = fixture("person.yaml");
    let slots: Vec<String> = effective_slots(&schema, "Person").into_iter().collect();
    assert_eq!(
        slots,
        vec!["created_at", "email", "id", "name", "status", "updated_at"]
    );
}

#[test]
fn test_diamond_root_appears_once() {
    let schema = fixture("diamond.yaml");
    let ancestry = ancestors_of(&schema, "A");

    assert_eq!(ancestry.ancestors, vec!["B", "Root", "C"]);
    assert!(ancestry.is_clean());
    assert!(validate(&schema).is_valid());
}

#[test]
fn test_cycle_detected_and_completes() {
    let schema = fixture("cycle.yaml");
    let report = validate(&schema);

    let cyclic: Vec<&str> = report
        .of_kind(ErrorKind::CyclicInheritance)
        .map(|e| e.class_name.as_str())
        .collect();
    assert!(cyclic.contains(&"A") || cyclic.contains(&"B"));
    assert_eq!(report.len(), cyclic.len());
    assert_eq!(
        InheritanceGraph::build(&schema).cyclic_groups(),
        vec![vec!["A".to_string(), "B".to_string()]]
    );
}

#[test]
fn test_mixed_errors_in_declaration_order() {
    let schema = fixture("partial.yaml");
    assert_eq!(
        found(&schema),
        vec![
            entry(ErrorKind::UndefinedSlot, "NamedThing", "name"),
            entry(ErrorKind::UndefinedSlot, "Order", "id"),
            entry(ErrorKind::UndefinedSlot, "Order", "created_at"),
            entry(ErrorKind::UndefinedSlot, "Order", "total_amount"),
            entry(ErrorKind::UndefinedEnum, "Order", "OrderPriority"),
            entry(ErrorKind::UndefinedParent, "Invoice", "Auditable"),
            entry(ErrorKind::UndefinedSlot, "Invoice", "id"),
        ]
    );
}

#[test]
fn test_soundness_every_reported_slot_is_missing() {
    for name in ["scenario_a.yaml", "partial.yaml", "cycle.yaml", "person.yaml", "diamond.yaml"] {
        let schema = fixture(name);
        for error in validate(&schema).of_kind(ErrorKind::UndefinedSlot) {
            assert!(!schema.slots.contains_key(&error.slot_or_enum_name), "{}: {}", name, error);
            assert!(
                !effective_slots(&schema, &error.class_name).contains(&error.slot_or_enum_name),
                "{}: {}",
                name,
                error
            );
        }
    }
}

// =============================================================================
// Repair
// =============================================================================

#[test]
fn test_scenario_repair_identifier() {
    let schema = fixture("scenario_a.yaml");
    let report = auto_repair(&schema);

    assert_eq!(report.actions.len(), 1);
    assert_eq!(report.actions[0].slot_name, "id");
    assert_eq!(report.actions[0].applies_to_classes, vec!["TestClass"]);
    assert!(report.is_valid());
    assert!(validate(&report.schema).is_valid());
}

#[test]
fn test_partial_repair_reports_residuals() {
    let schema = fixture("partial.yaml");
    let report = auto_repair(&schema);

    let repaired: Vec<(&str, &str)> = report
        .actions
        .iter()
        .map(|a| (a.slot_name.as_str(), a.strategy_name.as_str()))
        .collect();
    assert_eq!(
        repaired,
        vec![
            ("name", "name_slot"),
            ("id", "identifier_slot"),
            ("created_at", "created_at_slot"),
        ]
    );
    assert_eq!(report.actions[1].applies_to_classes, vec!["Order", "Invoice"]);

    assert!(!report.is_valid());
    let remaining: Vec<(ErrorKind, &str)> = report
        .remaining
        .iter()
        .map(|e| (e.kind, e.slot_or_enum_name.as_str()))
        .collect();
    assert_eq!(
        remaining,
        vec![
            (ErrorKind::UndefinedSlot, "total_amount"),
            (ErrorKind::UndefinedEnum, "OrderPriority"),
            (ErrorKind::UndefinedParent, "Auditable"),
        ]
    );
}

#[test]
fn test_repair_is_idempotent() {
    for name in ["scenario_a.yaml", "partial.yaml", "person.yaml"] {
        let first = auto_repair(&fixture(name));
        let second = auto_repair(&first.schema);
        assert!(second.actions.is_empty(), "{}", name);
        assert_eq!(second.remaining, first.remaining, "{}", name);
    }
}

#[test]
fn test_repair_leaves_input_untouched() {
    let schema = fixture("partial.yaml");
    let before = Checksum::of_schema(&schema);
    let report = auto_repair(&schema);

    assert_eq!(Checksum::of_schema(&schema), before);
    assert_eq!(report.checksum_before, before);
    assert!(report.changed());
}

#[test]
fn test_repaired_yaml_round_trips() {
    let report = auto_repair(&fixture("partial.yaml"));
    let yaml = report.schema.to_yaml_string().unwrap();
    let reloaded = Schema::from_yaml_str(&yaml).unwrap();

    assert_eq!(reloaded, report.schema);
    assert_eq!(reloaded.name(), Some("orders"));
    assert!(reloaded.header.contains_key("prefixes"));
    assert_eq!(validate(&reloaded), report.remaining);
}

#[test]
fn test_repaired_yaml_keeps_enum_metadata() {
    let report = auto_repair(&fixture("partial.yaml"));
    let yaml = report.schema.to_yaml_string().unwrap();

    assert!(yaml.contains("enum_uri:"));
    assert!(yaml.contains("ex:OrderStatus"));
    assert!(yaml.contains("description: awaiting shipment"));
    assert!(yaml.contains("ex:Pending"));
    assert!(yaml.contains("shipped: {}"));
    assert!(yaml.contains("default_range: string"));
}

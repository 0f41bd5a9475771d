//! Auto-Repair
//!
//! Synthesizes minimal global slot definitions for undefined slots whose
//! names are on the strategy allow-list, then re-validates.
//!
//! ## Guarantees
//!
//! - The input schema is never mutated; repair works on a clone.
//! - Only [`ErrorKind::UndefinedSlot`] findings are ever acted on.
//! - [`RepairReport::is_valid`] is true only when nothing remains broken.
//! - Repairing an already repaired schema produces no actions.

pub mod strategies;

pub use strategies::{RepairStrategy, StrategyRegistry, Synthesizer};

use serde::Serialize;
use tracing::{debug, info};

use crate::checksum::Checksum;
use crate::error::Result;
use crate::schema::{ClassName, Schema, SlotDef, SlotName};
use crate::validate::{ErrorKind, ValidationReport, Validator};

/// Repair with the built-in strategies
pub fn auto_repair(schema: &Schema) -> RepairReport {
    AutoRepairer::new().repair(schema)
}

/// One synthesized slot definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairAction {
    pub strategy_name: String,
    pub slot_name: SlotName,
    pub synthesized_definition: SlotDef,
    /// Every class that referenced the slot, in declaration order
    pub applies_to_classes: Vec<ClassName>,
}

/// Outcome of one repair pass
#[derive(Debug, Clone, Serialize)]
pub struct RepairReport {
    /// The repaired copy
    #[serde(skip)]
    pub schema: Schema,
    pub actions: Vec<RepairAction>,
    /// Findings left after re-validation
    pub remaining: ValidationReport,
    pub checksum_before: Checksum,
    pub checksum_after: Checksum,
}

impl RepairReport {
    /// True only when re-validation found nothing
    pub fn is_valid(&self) -> bool {
        self.remaining.is_valid()
    }

    /// Whether any slot was synthesized
    pub fn changed(&self) -> bool {
        self.checksum_before != self.checksum_after
    }

    /// Consume the report, keeping the repaired schema
    pub fn into_schema(self) -> Schema {
        self.schema
    }
}

/// Validator plus an enabled strategy set
#[derive(Debug, Clone, Default)]
pub struct AutoRepairer {
    registry: StrategyRegistry,
    validator: Validator,
}

impl AutoRepairer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable only the named strategies
    pub fn with_strategies<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Ok(Self::new().with_registry(StrategyRegistry::select(names)?))
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Run one repair pass over a copy of `schema`
    pub fn repair(&self, schema: &Schema) -> RepairReport {
        let checksum_before = Checksum::of_schema(schema);
        let mut repaired = schema.clone();
        let initial = self.validator.validate(schema);
        let mut actions = Vec::new();

        for slot_name in initial.undefined_slot_names() {
            let Some(strategy) = self.registry.find(slot_name) else {
                debug!(slot = slot_name, "no repair strategy matches");
                continue;
            };

            let definition = strategy.synthesize(slot_name);
            let mut applies_to_classes: Vec<ClassName> = Vec::new();
            for error in initial.of_kind(ErrorKind::UndefinedSlot) {
                if error.slot_or_enum_name == slot_name
                    && !applies_to_classes.contains(&error.class_name)
                {
                    applies_to_classes.push(error.class_name.clone());
                }
            }

            info!(
                strategy = strategy.name,
                slot = slot_name,
                classes = ?applies_to_classes,
                "synthesized slot definition"
            );

            repaired.add_slot(definition.clone());
            actions.push(RepairAction {
                strategy_name: strategy.name.to_string(),
                slot_name: slot_name.to_string(),
                synthesized_definition: definition,
                applies_to_classes,
            });
        }

        let remaining = if actions.is_empty() {
            initial
        } else {
            self.validator.validate(&repaired)
        };
        let checksum_after = Checksum::of_schema(&repaired);

        debug!(
            actions = actions.len(),
            remaining = remaining.len(),
            "repair pass complete"
        );

        RepairReport {
            schema: repaired,
            actions,
            remaining,
            checksum_before,
            checksum_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ClassDef;
    use crate::validate::validate;

    fn scenario_a() -> Schema {
        Schema::new().with_class(ClassDef::new("TestClass").with_slots(["id"]))
    }

    #[test]
    fn test_repairs_identifier() {
        let report = auto_repair(&scenario_a());

        assert_eq!(report.actions.len(), 1);
        let action = &report.actions[0];
        assert_eq!(action.strategy_name, "identifier_slot");
        assert_eq!(action.slot_name, "id");
        assert_eq!(action.applies_to_classes, vec!["TestClass"]);
        assert!(action.synthesized_definition.identifier);
        assert!(report.is_valid());
        assert!(report.changed());
        assert!(validate(&report.schema).is_valid());
    }

    #[test]
    fn test_input_not_mutated() {
        let schema = scenario_a();
        let before = schema.clone();
        let _ = auto_repair(&schema);
        assert_eq!(schema, before);
        assert!(schema.slots.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let first = auto_repair(&scenario_a());
        let second = auto_repair(&first.schema);
        assert!(second.actions.is_empty());
        assert!(!second.changed());
        assert_eq!(second.schema, first.schema);
    }

    #[test]
    fn test_partial_repair_is_honest() {
        let schema = Schema::new().with_class(
            ClassDef::new("Order")
                .with_slots(["id", "total_amount"])
                .with_attribute(SlotDef::new("state").with_range("OrderState")),
        );

        let report = auto_repair(&schema);
        assert_eq!(report.actions.len(), 1);
        assert!(!report.is_valid());
        let kinds: Vec<ErrorKind> = report.remaining.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ErrorKind::UndefinedSlot, ErrorKind::UndefinedEnum]);
        assert_eq!(report.remaining.errors()[0].slot_or_enum_name, "total_amount");
    }

    #[test]
    fn test_one_action_per_slot() {
        let schema = Schema::new()
            .with_class(ClassDef::new("Person").with_slots(["id", "name"]))
            .with_class(ClassDef::new("Company").with_slots(["id", "created_at"]));

        let report = auto_repair(&schema);
        let slots: Vec<&str> = report.actions.iter().map(|a| a.slot_name.as_str()).collect();
        assert_eq!(slots, vec!["id", "name", "created_at"]);
        assert_eq!(report.actions[0].applies_to_classes, vec!["Person", "Company"]);
        assert!(report.is_valid());
    }

    #[test]
    fn test_disabled_strategy() {
        let repairer = AutoRepairer::with_strategies(&["name_slot"]).unwrap();
        let report = repairer.repair(&scenario_a());

        assert!(report.actions.is_empty());
        assert!(!report.changed());
        assert_eq!(report.remaining.len(), 1);
    }

    #[test]
    fn test_structural_errors_pass_through() {
        let schema = Schema::new()
            .with_class(ClassDef::new("A").with_is_a("B").with_slots(["name"]))
            .with_class(ClassDef::new("B").with_is_a("A"));

        let report = auto_repair(&schema);
        assert_eq!(report.actions.len(), 1);
        assert_eq!(report.remaining.of_kind(ErrorKind::CyclicInheritance).count(), 2);
        assert!(!report.is_valid());
    }
}

//! Effective Slot Resolution
//!
//! The effective slot set of a class is every slot name it may legally
//! reference: its own attributes, its own slot references that have a global
//! definition, and the same two things for every ancestor.

use std::collections::BTreeSet;

use super::ancestry::{ancestors_of, Ancestry};
use crate::schema::{ClassDef, Schema, SlotName};

/// Slot names usable by `class_name`. Empty if the class does not exist.
pub fn effective_slots(schema: &Schema, class_name: &str) -> BTreeSet<SlotName> {
    let ancestry = ancestors_of(schema, class_name);
    effective_slots_with(schema, class_name, &ancestry)
}

/// Same as [`effective_slots`], reusing an already computed [`Ancestry`]
pub fn effective_slots_with(
    schema: &Schema,
    class_name: &str,
    ancestry: &Ancestry,
) -> BTreeSet<SlotName> {
    let mut slots = BTreeSet::new();

    let Some(class) = schema.class(class_name) else {
        return slots;
    };

    contribute(schema, class, &mut slots);
    for ancestor in &ancestry.ancestors {
        if let Some(ancestor) = schema.class(ancestor) {
            contribute(schema, ancestor, &mut slots);
        }
    }

    slots
}

/// Slots a single class brings to itself and its descendants
fn contribute(schema: &Schema, class: &ClassDef, slots: &mut BTreeSet<SlotName>) {
    slots.extend(class.attributes.keys().cloned());
    slots.extend(
        class
            .slots
            .iter()
            .filter(|name| schema.slots.contains_key(name.as_str()))
            .cloned(),
    );
}

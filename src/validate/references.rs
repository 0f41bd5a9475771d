//! Reference Collection
//!
//! Lists what each class refers to, without deciding whether any of it
//! resolves. The validator checks these lists against the effective slot
//! sets and the schema's definitions.

use serde::Serialize;

use crate::schema::{ClassDef, ClassName, Schema, SlotName};

/// A slot together with the range it declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeReference {
    pub slot_name: SlotName,
    pub range: String,
}

/// Everything one class refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassReferences {
    pub class_name: ClassName,
    /// Own `slots` entries, in order, without repeats
    pub slots: Vec<SlotName>,
    /// Ranges of the slots this class uses: own slot references that have a
    /// global definition, then own attributes
    pub ranges: Vec<RangeReference>,
}

/// References of every class, in declaration order
pub fn collect_references(schema: &Schema) -> Vec<ClassReferences> {
    schema
        .classes
        .values()
        .map(|class| class_references(schema, class))
        .collect()
}

/// References of one class, if it exists
pub fn references_for(schema: &Schema, class_name: &str) -> Option<ClassReferences> {
    schema.class(class_name).map(|class| class_references(schema, class))
}

fn class_references(schema: &Schema, class: &ClassDef) -> ClassReferences {
    let mut slots: Vec<SlotName> = Vec::with_capacity(class.slots.len());
    for name in &class.slots {
        if !slots.contains(name) {
            slots.push(name.clone());
        }
    }

    let global = slots
        .iter()
        .filter_map(|name| schema.slots.get(name))
        .filter_map(|slot| Some((slot.name.clone(), slot.range.clone()?)));
    let inline = class
        .attributes
        .values()
        .filter_map(|slot| Some((slot.name.clone(), slot.range.clone()?)));

    let ranges = global
        .chain(inline)
        .map(|(slot_name, range)| RangeReference { slot_name, range })
        .collect();

    ClassReferences {
        class_name: class.name.clone(),
        slots,
        ranges,
    }
}

//! Schema Validation
//!
//! Cross-references what each class uses against what its inheritance
//! closure defines. For each class, in declaration order:
//!
//! 1. resolve ancestors, reporting cycles and undefined parents once per
//!    offending edge, against the class that declares the edge
//! 2. compute the effective slot set
//! 3. report each own slot reference that resolves nowhere
//! 4. report each used slot whose range names nothing in the schema
//!
//! Validation is read-only and never fails; every problem is a
//! [`ValidationError`] in the returned [`ValidationReport`].

pub mod diagnostics;
pub mod references;

pub use diagnostics::{ErrorKind, ValidationError, ValidationReport};
pub use references::{collect_references, references_for, ClassReferences, RangeReference};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::{BTreeSet, HashSet};

use crate::graph::{ancestors_of, effective_slots_with};
use crate::schema::{Schema, SlotName};

/// Validate with default settings
pub fn validate(schema: &Schema) -> ValidationReport {
    Validator::new().validate(schema)
}

/// Schema validator
#[derive(Debug, Clone)]
pub struct Validator {
    /// Add "did you mean" hints to undefined slot messages
    suggest_similar: bool,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self {
            suggest_similar: true,
        }
    }

    /// Enable or disable "did you mean" hints
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggest_similar = enabled;
        self
    }

    /// Run a full validation pass
    pub fn validate(&self, schema: &Schema) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut structural = HashSet::new();

        for refs in collect_references(schema) {
            let class_name = refs.class_name.as_str();

            let ancestry = ancestors_of(schema, class_name);
            for issue in &ancestry.issues {
                let error = ValidationError::from_issue(issue);
                if structural.insert(error.key()) {
                    report.push(error);
                }
            }

            let effective = effective_slots_with(schema, class_name, &ancestry);
            for slot_name in &refs.slots {
                if effective.contains(slot_name) || schema.slots.contains_key(slot_name) {
                    continue;
                }
                let hint = self.suggest(schema, &effective, slot_name);
                report.push(ValidationError::undefined_slot(class_name, slot_name, hint.as_deref()));
            }

            let mut seen_ranges: HashSet<&str> = HashSet::new();
            for reference in &refs.ranges {
                if schema.range_is_resolvable(&reference.range) {
                    continue;
                }
                if seen_ranges.insert(&reference.range) {
                    report.push(ValidationError::undefined_enum(
                        class_name,
                        &reference.slot_name,
                        &reference.range,
                    ));
                }
            }
        }

        tracing::debug!(
            classes = schema.classes.len(),
            errors = report.len(),
            "validation pass complete"
        );
        report
    }

    /// Closest defined slot name to `missing`, if any is a fuzzy match
    fn suggest(&self, schema: &Schema, effective: &BTreeSet<SlotName>, missing: &str) -> Option<String> {
        if !self.suggest_similar {
            return None;
        }

        let matcher = SkimMatcherV2::default();
        schema
            .slots
            .keys()
            .chain(effective.iter())
            .filter(|candidate| candidate.as_str() != missing)
            .filter_map(|candidate| {
                matcher
                    .fuzzy_match(candidate, missing)
                    .map(|score| (score, candidate))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, candidate)| candidate.clone())
    }
}

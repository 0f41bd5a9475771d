//! Repair Strategies
//!
//! The fixed, ordered table of slot names that auto-repair is allowed to
//! synthesize. Matching is exact and case-sensitive. A name that is not on
//! this list is never repaired, however similar it looks.
//!
//! | strategy           | slot names           | range      | flags                 |
//! |--------------------|----------------------|------------|-----------------------|
//! | `identifier_slot`  | `id`, `identifier`   | `string`   | required, identifier  |
//! | `name_slot`        | `name`               | `string`   |                       |
//! | `description_slot` | `description`        | `string`   |                       |
//! | `created_at_slot`  | `created_at`         | `datetime` |                       |
//! | `updated_at_slot`  | `updated_at`         | `datetime` |                       |

use regex::Regex;
use std::fmt;

use crate::error::{Result, SchemaError};
use crate::schema::SlotDef;

/// Builds the slot definition for a matched name
pub type Synthesizer = fn(&str) -> SlotDef;

/// One entry of the strategy table
#[derive(Clone)]
pub struct RepairStrategy {
    pub name: &'static str,
    pattern: Regex,
    synthesize: Synthesizer,
}

impl RepairStrategy {
    fn new(name: &'static str, pattern: &str, synthesize: Synthesizer) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            synthesize,
        }
    }

    /// Whether this strategy handles `slot_name`
    pub fn matches(&self, slot_name: &str) -> bool {
        self.pattern.is_match(slot_name)
    }

    /// Build the minimal definition for `slot_name`
    pub fn synthesize(&self, slot_name: &str) -> SlotDef {
        (self.synthesize)(slot_name)
    }
}

impl fmt::Debug for RepairStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepairStrategy")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

fn auto_description(slot_name: &str, what: &str) -> String {
    format!("{} (auto-generated definition for '{}')", what, slot_name)
}

fn identifier_slot(slot_name: &str) -> SlotDef {
    SlotDef::new(slot_name)
        .with_range("string")
        .required()
        .identifier()
        .with_description(auto_description(slot_name, "Unique identifier"))
}

fn name_slot(slot_name: &str) -> SlotDef {
    SlotDef::new(slot_name)
        .with_range("string")
        .with_description(auto_description(slot_name, "Human-readable name"))
}

fn description_slot(slot_name: &str) -> SlotDef {
    SlotDef::new(slot_name)
        .with_range("string")
        .with_description(auto_description(slot_name, "Free-text description"))
}

fn created_at_slot(slot_name: &str) -> SlotDef {
    SlotDef::new(slot_name)
        .with_range("datetime")
        .with_description(auto_description(slot_name, "Creation timestamp"))
}

fn updated_at_slot(slot_name: &str) -> SlotDef {
    SlotDef::new(slot_name)
        .with_range("datetime")
        .with_description(auto_description(slot_name, "Last update timestamp"))
}

/// Ordered set of enabled strategies. The first match wins.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<RepairStrategy>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StrategyRegistry {
    /// Every built-in strategy, in priority order
    pub fn builtin() -> Self {
        Self {
            strategies: vec![
                RepairStrategy::new("identifier_slot", r"^(id|identifier)$", identifier_slot),
                RepairStrategy::new("name_slot", r"^name$", name_slot),
                RepairStrategy::new("description_slot", r"^description$", description_slot),
                RepairStrategy::new("created_at_slot", r"^created_at$", created_at_slot),
                RepairStrategy::new("updated_at_slot", r"^updated_at$", updated_at_slot),
            ],
        }
    }

    /// Names of the built-in strategies, in priority order
    pub fn builtin_names() -> Vec<&'static str> {
        Self::builtin().names()
    }

    /// Keep only the named strategies, preserving priority order
    pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let builtin = Self::builtin();
        for name in names {
            if !builtin.strategies.iter().any(|s| s.name == name.as_ref()) {
                return Err(SchemaError::UnknownStrategy(name.as_ref().to_string()));
            }
        }

        Ok(Self {
            strategies: builtin
                .strategies
                .into_iter()
                .filter(|s| names.iter().any(|n| n.as_ref() == s.name))
                .collect(),
        })
    }

    /// An empty registry; nothing is ever repaired
    pub fn none() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// First strategy that handles `slot_name`
    pub fn find(&self, slot_name: &str) -> Option<&RepairStrategy> {
        self.strategies.iter().find(|s| s.matches(slot_name))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

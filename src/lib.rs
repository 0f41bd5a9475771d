//! LinkML Slot Repair
//!
//! Validation and auto-repair for schemas written in a LinkML-style dialect:
//! classes with `slots`, inline `attributes`, single inheritance via `is_a`,
//! reusable `mixins`, and `enums`.
//!
//! ## Features
//!
//! - **Inheritance Resolution**: Ancestor closures over `is_a` and `mixins`,
//!   with cycle and undefined-parent detection
//! - **Effective Slots**: Every slot a class can use, through its whole closure
//! - **Validation**: Structured findings for undefined slots, enums and parents
//! - **Auto-Repair**: Minimal slot definitions for a fixed allow-list of
//!   conventional names (`id`, `name`, `description`, timestamps)
//! - **Graph Export**: Inheritance graph as GraphViz DOT
//!
//! ## Pipeline
//!
//! ```text
//! Schema ──► ancestors_of ──► effective_slots ──► validate ──► ValidationReport
//!                                                    │
//!                                                    ▼
//!                                              auto_repair ──► RepairReport
//!                                        (clone, synthesize, re-validate)
//! ```
//!
//! ## Example
//!
//! ```
//! use linkml_slot_repair::{auto_repair, validate, ClassDef, Schema};
//!
//! let schema = Schema::new().with_class(ClassDef::new("Person").with_slots(["id"]));
//! assert_eq!(validate(&schema).len(), 1);
//!
//! let report = auto_repair(&schema);
//! assert!(report.is_valid());
//! assert_eq!(report.actions[0].strategy_name, "identifier_slot");
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod repair;
pub mod schema;
pub mod validate;

pub use checksum::Checksum;
pub use config::ValidatorConfig;
pub use error::{Result, SchemaError};
pub use loader::{discover, load, LoadedSchema};
pub use graph::{ancestors_of, effective_slots, Ancestry, InheritanceGraph, InheritanceIssue};
pub use repair::{auto_repair, AutoRepairer, RepairAction, RepairReport, StrategyRegistry};
pub use schema::{ClassDef, EnumDef, Schema, SlotDef};
pub use validate::{validate, ErrorKind, ValidationError, ValidationReport, Validator};

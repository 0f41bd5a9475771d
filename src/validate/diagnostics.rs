//! Validation Diagnostics
//!
//! Structured findings produced by the validator. Every finding is data;
//! nothing here is ever raised as a Rust error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::graph::InheritanceIssue;
use crate::schema::ClassName;

// =============================================================================
// Error Kinds
// =============================================================================

/// Category of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A class references a slot defined nowhere in its closure
    UndefinedSlot,
    /// A slot range names an enum (or type/class) that does not exist
    UndefinedEnum,
    /// `is_a` or a mixin names a class that does not exist
    UndefinedParent,
    /// `is_a` / `mixins` edges form a cycle
    CyclicInheritance,
}

impl ErrorKind {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UndefinedSlot => "E101",
            Self::UndefinedEnum => "E102",
            Self::UndefinedParent => "E103",
            Self::CyclicInheritance => "E104",
        }
    }

    /// Whether auto-repair may ever act on this kind
    pub fn is_repairable(&self) -> bool {
        matches!(self, Self::UndefinedSlot)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UndefinedSlot => "undefined slot",
            Self::UndefinedEnum => "undefined enum",
            Self::UndefinedParent => "undefined parent",
            Self::CyclicInheritance => "cyclic inheritance",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Class the finding is attributed to
    pub class_name: ClassName,
    /// The slot, enum, or parent class name that failed to resolve
    pub slot_or_enum_name: String,
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    pub fn new(
        class_name: impl Into<ClassName>,
        slot_or_enum_name: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            slot_or_enum_name: slot_or_enum_name.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn undefined_slot(class_name: &str, slot_name: &str, hint: Option<&str>) -> Self {
        let mut message = format!(
            "Class '{}' references slot '{}' which is not defined in the schema's slots, its attributes, or any ancestor",
            class_name, slot_name
        );
        if let Some(hint) = hint {
            message.push_str(&format!(" (did you mean '{}'?)", hint));
        }
        Self::new(class_name, slot_name, ErrorKind::UndefinedSlot, message)
    }

    pub fn undefined_enum(class_name: &str, slot_name: &str, range: &str) -> Self {
        Self::new(
            class_name,
            range,
            ErrorKind::UndefinedEnum,
            format!(
                "Slot '{}' used by class '{}' has range '{}' which is not a defined enum, class, or type",
                slot_name, class_name, range
            ),
        )
    }

    /// Convert an inheritance walk issue, attributed to the declaring class
    pub fn from_issue(issue: &InheritanceIssue) -> Self {
        match issue {
            InheritanceIssue::UndefinedParent { declared_by, parent, edge } => Self::new(
                declared_by.as_str(),
                parent.as_str(),
                ErrorKind::UndefinedParent,
                format!(
                    "Class '{}' declares {} parent '{}' which is not a defined class",
                    declared_by, edge, parent
                ),
            ),
            InheritanceIssue::Cycle { declared_by, parent, path } => Self::new(
                declared_by.as_str(),
                parent.as_str(),
                ErrorKind::CyclicInheritance,
                format!("Inheritance cycle: {}", path.join(" -> ")),
            ),
        }
    }

    /// Identity used to suppress duplicate findings
    pub(crate) fn key(&self) -> (ErrorKind, ClassName, String) {
        (self.kind, self.class_name.clone(), self.slot_or_enum_name.clone())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({}.{})",
            self.kind.code(),
            self.kind,
            self.message,
            self.class_name,
            self.slot_or_enum_name
        )
    }
}

// =============================================================================
// Validation Report
// =============================================================================

/// Ordered findings of one validation pass. Empty means the schema is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// True when there are no findings
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Findings of one kind, in report order
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }

    /// Distinct undefined slot names in first-seen order
    pub fn undefined_slot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for error in self.of_kind(ErrorKind::UndefinedSlot) {
            if !names.contains(&error.slot_or_enum_name.as_str()) {
                names.push(&error.slot_or_enum_name);
            }
        }
        names
    }

    /// Number of findings per kind
    pub fn count_by_kind(&self) -> BTreeMap<ErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for error in &self.errors {
            *counts.entry(error.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Format every finding on its own line, followed by a summary
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for error in &self.errors {
            output.push_str(&format!("{}\n", error));
        }

        if self.is_valid() {
            output.push_str("schema is valid\n");
        } else {
            let summary: Vec<String> = self
                .count_by_kind()
                .into_iter()
                .map(|(kind, count)| format!("{} {}", count, kind))
                .collect();
            output.push_str(&format!("\n{} error(s): {}\n", self.len(), summary.join(", ")));
        }

        output
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl From<Vec<ValidationError>> for ValidationReport {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ParentEdge;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ErrorKind::UndefinedSlot.code(),
            ErrorKind::UndefinedEnum.code(),
            ErrorKind::UndefinedParent.code(),
            ErrorKind::CyclicInheritance.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
        assert!(ErrorKind::UndefinedSlot.is_repairable());
        assert!(!ErrorKind::UndefinedEnum.is_repairable());
    }

    #[test]
    fn test_issue_conversion() {
        let error = ValidationError::from_issue(&InheritanceIssue::UndefinedParent {
            declared_by: "Person".to_string(),
            parent: "Agent".to_string(),
            edge: ParentEdge::IsA,
        });
        assert_eq!(error.kind, ErrorKind::UndefinedParent);
        assert_eq!(error.class_name, "Person");
        assert_eq!(error.slot_or_enum_name, "Agent");
        assert!(error.message.contains("is_a parent 'Agent'"));
    }

    #[test]
    fn test_report_helpers() {
        let mut report = ValidationReport::new();
        report.push(ValidationError::undefined_slot("A", "id", None));
        report.push(ValidationError::undefined_slot("B", "id", None));
        report.push(ValidationError::undefined_slot("B", "name", Some("full_name")));
        report.push(ValidationError::undefined_enum("B", "status", "Status"));

        assert!(!report.is_valid());
        assert_eq!(report.undefined_slot_names(), vec!["id", "name"]);
        assert_eq!(report.count_by_kind()[&ErrorKind::UndefinedSlot], 3);
        assert!(report.errors()[2].message.contains("did you mean 'full_name'"));

        let text = report.format_all();
        assert!(text.contains("[E101]"));
        assert!(text.contains("4 error(s)"));
    }

    #[test]
    fn test_report_serializes_as_list() {
        let report = ValidationReport::from(vec![ValidationError::undefined_slot("TestClass", "id", None)]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value[0]["class_name"], "TestClass");
        assert_eq!(value[0]["kind"], "UndefinedSlot");
    }
}

//! Ancestor Resolution
//!
//! Walks `is_a` and `mixins` edges depth-first to compute the ancestor
//! closure of a class. Two sets drive the walk:
//!
//! - the **path** set holds the classes on the current descent; meeting one
//!   of them again closes a cycle, which is recorded and not followed
//! - the **seen** set holds every class already reached; meeting one of
//!   them again is a diamond and is silently skipped
//!
//! The walk uses an explicit stack, so arbitrarily deep hierarchies cannot
//! overflow the call stack.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::schema::{ClassName, Schema};

// =============================================================================
// Parent Edges
// =============================================================================

/// How a class names one of its parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentEdge {
    IsA,
    Mixin,
}

impl fmt::Display for ParentEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentEdge::IsA => write!(f, "is_a"),
            ParentEdge::Mixin => write!(f, "mixin"),
        }
    }
}

// =============================================================================
// Inheritance Issues
// =============================================================================

/// A structural problem met while walking a class's ancestry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum InheritanceIssue {
    /// `declared_by` names a parent that is not a class in the schema
    UndefinedParent {
        declared_by: ClassName,
        parent: ClassName,
        edge: ParentEdge,
    },
    /// The edge `declared_by -> parent` leads back onto the current path
    Cycle {
        declared_by: ClassName,
        parent: ClassName,
        /// The cycle, starting and ending at `parent`
        path: Vec<ClassName>,
    },
}

impl InheritanceIssue {
    /// The class whose declaration contains the offending edge
    pub fn declared_by(&self) -> &str {
        match self {
            InheritanceIssue::UndefinedParent { declared_by, .. }
            | InheritanceIssue::Cycle { declared_by, .. } => declared_by,
        }
    }

    /// The parent named by the offending edge
    pub fn parent(&self) -> &str {
        match self {
            InheritanceIssue::UndefinedParent { parent, .. }
            | InheritanceIssue::Cycle { parent, .. } => parent,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, InheritanceIssue::Cycle { .. })
    }
}

// =============================================================================
// Ancestry
// =============================================================================

/// Result of resolving one class's ancestors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ancestry {
    /// The class that was resolved
    pub class_name: ClassName,
    /// Ancestors in first-seen depth-first order, excluding `class_name`
    pub ancestors: Vec<ClassName>,
    /// Cycles and undefined parents found on the way
    pub issues: Vec<InheritanceIssue>,
}

impl Ancestry {
    /// No cycles and no undefined parents
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

struct Frame<'a> {
    name: &'a str,
    parents: Vec<(ParentEdge, &'a str)>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(schema: &'a Schema, name: &'a str) -> Self {
        let parents = schema
            .classes
            .get(name)
            .map(|class| {
                class
                    .is_a
                    .iter()
                    .map(|p| (ParentEdge::IsA, p.as_str()))
                    .chain(class.mixins.iter().map(|m| (ParentEdge::Mixin, m.as_str())))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name,
            parents,
            next: 0,
        }
    }
}

/// Resolve the ancestors of `class_name`.
///
/// Returns an empty [`Ancestry`] if the class itself does not exist.
pub fn ancestors_of(schema: &Schema, class_name: &str) -> Ancestry {
    let mut ancestry = Ancestry {
        class_name: class_name.to_string(),
        ..Default::default()
    };

    let Some((root, _)) = schema.classes.get_key_value(class_name) else {
        return ancestry;
    };

    let mut on_path: HashSet<&str> = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::new();
    on_path.insert(root);
    seen.insert(root);

    let mut stack = vec![Frame::new(schema, root)];

    while let Some(frame) = stack.last_mut() {
        let Some(&(edge, parent)) = frame.parents.get(frame.next) else {
            on_path.remove(frame.name);
            stack.pop();
            continue;
        };
        frame.next += 1;
        let declared_by = frame.name;

        if on_path.contains(parent) {
            let start = stack.iter().position(|f| f.name == parent).unwrap_or(0);
            let mut path: Vec<ClassName> = stack[start..].iter().map(|f| f.name.to_string()).collect();
            path.push(parent.to_string());

            tracing::debug!(class = class_name, declared_by, parent, "inheritance cycle");
            ancestry.issues.push(InheritanceIssue::Cycle {
                declared_by: declared_by.to_string(),
                parent: parent.to_string(),
                path,
            });
            continue;
        }

        if !seen.insert(parent) {
            continue;
        }

        match schema.classes.get_key_value(parent) {
            Some((parent_name, _)) => {
                ancestry.ancestors.push(parent_name.clone());
                on_path.insert(parent_name);
                stack.push(Frame::new(schema, parent_name));
            }
            None => {
                tracing::debug!(class = class_name, declared_by, parent, %edge, "undefined parent");
                ancestry.issues.push(InheritanceIssue::UndefinedParent {
                    declared_by: declared_by.to_string(),
                    parent: parent.to_string(),
                    edge,
                });
            }
        }
    }

    ancestry
}

//! Schema fingerprints
//!
//! SHA-256 over the canonical JSON form of a schema. Maps serialize in
//! declaration order, so two schemas with the same content authored in the
//! same order share a fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::schema::Schema;

/// SHA-256 hex digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from text, e.g. a schema file as read from disk
    pub fn from_text(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Fingerprint of a schema's canonical serialization
    pub fn of_schema(schema: &Schema) -> Self {
        let canonical = serde_json::to_vec(schema).unwrap_or_default();
        Self::from_bytes(&canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First twelve hex digits, for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }

    /// Whether `content` hashes to this checksum
    pub fn verify(&self, content: &str) -> bool {
        Self::from_text(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDef, SlotDef};

    #[test]
    fn test_checksum_consistency() {
        let schema = Schema::new().with_class(ClassDef::new("Person").with_slots(["id"]));
        assert_eq!(Checksum::of_schema(&schema), Checksum::of_schema(&schema.clone()));
        assert_eq!(Checksum::of_schema(&schema).as_str().len(), 64);
    }

    #[test]
    fn test_checksum_tracks_changes() {
        let schema = Schema::new().with_class(ClassDef::new("Person").with_slots(["id"]));
        let repaired = schema.clone().with_slot(SlotDef::new("id").with_range("string"));
        assert_ne!(Checksum::of_schema(&schema), Checksum::of_schema(&repaired));
    }

    #[test]
    fn test_checksum_verification() {
        let content = "classes:\n  Person: {}\n";
        let checksum = Checksum::from_text(content);
        assert!(checksum.verify(content));
        assert!(!checksum.verify("different content"));
        assert_eq!(checksum.short().len(), 12);
    }
}

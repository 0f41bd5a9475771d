//! Schema types and structures
//!
//! In-memory form of a LinkML-style schema: classes, slots, enums and the
//! raw `is_a` / `mixins` relations between classes. Nothing here resolves
//! inheritance; see [`crate::graph`] for that.
//!
//! Every map is insertion ordered so that validation output follows the
//! order in which classes and slots were authored.

mod decode;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Name of a class in [`Schema::classes`]
pub type ClassName = String;

/// Name of a slot in [`Schema::slots`] or in a class's `attributes`
pub type SlotName = String;

/// Ranges that always resolve without a declaration in the schema
pub const BUILTIN_TYPES: &[&str] = &[
    "string",
    "integer",
    "float",
    "double",
    "decimal",
    "boolean",
    "date",
    "datetime",
    "time",
    "date_or_datetime",
    "uri",
    "uriorcurie",
    "curie",
    "ncname",
    "objectidentifier",
    "nodeidentifier",
    "jsonpointer",
    "jsonpath",
    "sparqlpath",
];

/// A complete schema document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    /// Top-level keys the engine does not interpret (`id`, `name`, `prefixes`,
    /// `imports`, `default_range`, ...). Kept so a repaired schema can be
    /// written back without losing them.
    #[serde(flatten)]
    pub header: IndexMap<String, Value>,
    /// Custom type declarations, keyed by type name
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, Value>,
    /// Classes in declaration order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub classes: IndexMap<ClassName, ClassDef>,
    /// Global slot definitions
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<SlotName, SlotDef>,
    /// Enum definitions
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub enums: IndexMap<String, EnumDef>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a class, keyed by its name
    pub fn add_class(&mut self, class: ClassDef) -> &mut Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Add (or replace) a global slot, keyed by its name
    pub fn add_slot(&mut self, slot: SlotDef) -> &mut Self {
        self.slots.insert(slot.name.clone(), slot);
        self
    }

    /// Add (or replace) an enum, keyed by its name
    pub fn add_enum(&mut self, enum_def: EnumDef) -> &mut Self {
        self.enums.insert(enum_def.name.clone(), enum_def);
        self
    }

    /// Builder form of [`Schema::add_class`]
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.add_class(class);
        self
    }

    /// Builder form of [`Schema::add_slot`]
    pub fn with_slot(mut self, slot: SlotDef) -> Self {
        self.add_slot(slot);
        self
    }

    /// Builder form of [`Schema::add_enum`]
    pub fn with_enum(mut self, enum_def: EnumDef) -> Self {
        self.add_enum(enum_def);
        self
    }

    /// Get a class by name
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// The schema's `name` header, if present
    pub fn name(&self) -> Option<&str> {
        self.header.get("name").and_then(Value::as_str)
    }

    /// Whether a slot `range` points at something that exists: a builtin
    /// type, a declared type, a class, or an enum.
    pub fn range_is_resolvable(&self, range: &str) -> bool {
        BUILTIN_TYPES.contains(&range)
            || self.types.contains_key(range)
            || self.classes.contains_key(range)
            || self.enums.contains_key(range)
    }

    /// Serialize to YAML, preserving declaration order
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serialize to a JSON value
    pub fn to_json_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A class definition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassDef {
    /// Class name (the key it is stored under)
    #[serde(skip)]
    pub name: ClassName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "std::ops::Not::not")]
    pub is_abstract: bool,
    #[serde(rename = "mixin", skip_serializing_if = "std::ops::Not::not")]
    pub is_mixin: bool,
    /// Primary parent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_a: Option<ClassName>,
    /// Additional parents, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<ClassName>,
    /// Slot references, resolved against the global slot section
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<SlotName>,
    /// Inline slot definitions local to this class
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<SlotName, SlotDef>,
    /// Keys the engine does not interpret (`slot_usage`, `class_uri`, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ClassDef {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the primary parent
    pub fn with_is_a(mut self, parent: impl Into<ClassName>) -> Self {
        self.is_a = Some(parent.into());
        self
    }

    /// Append mixins
    pub fn with_mixins<I, S>(mut self, mixins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ClassName>,
    {
        self.mixins.extend(mixins.into_iter().map(Into::into));
        self
    }

    /// Append slot references
    pub fn with_slots<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SlotName>,
    {
        self.slots.extend(slots.into_iter().map(Into::into));
        self
    }

    /// Add an inline attribute
    pub fn with_attribute(mut self, slot: SlotDef) -> Self {
        self.attributes.insert(slot.name.clone(), slot);
        self
    }

    /// Direct parents: `is_a` first, then mixins in order
    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.is_a
            .iter()
            .chain(self.mixins.iter())
            .map(String::as_str)
    }
}

/// A slot definition, either global or inline
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotDef {
    /// Slot name (the key it is stored under)
    #[serde(skip)]
    pub name: SlotName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Type, class, or enum name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub identifier: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub multivalued: bool,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl SlotDef {
    pub fn new(name: impl Into<SlotName>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }
}

/// An enum definition
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumDef {
    #[serde(skip)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed tokens with their bodies (`description`, `meaning`, ...).
    /// A token without a body maps to an empty mapping.
    pub permissible_values: IndexMap<String, Value>,
    /// Keys the engine does not interpret (`enum_uri`, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            permissible_values: values
                .into_iter()
                .map(|token| (token.into(), Value::Object(Default::default())))
                .collect(),
            extra: IndexMap::new(),
        }
    }

    /// Whether `token` is a permissible value
    pub fn allows(&self, token: &str) -> bool {
        self.permissible_values.contains_key(token)
    }

    /// Permissible tokens in declaration order
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.permissible_values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parents_order() {
        let class = ClassDef::new("A").with_is_a("Base").with_mixins(["M1", "M2"]);
        let parents: Vec<&str> = class.parents().collect();
        assert_eq!(parents, vec!["Base", "M1", "M2"]);
    }

    #[test]
    fn test_range_resolution() {
        let schema = Schema::new()
            .with_class(ClassDef::new("Person"))
            .with_enum(EnumDef::new("Status", ["active", "inactive"]));

        assert!(schema.range_is_resolvable("string"));
        assert!(schema.range_is_resolvable("Person"));
        assert!(schema.range_is_resolvable("Status"));
        assert!(!schema.range_is_resolvable("Priority"));
    }

    #[test]
    fn test_serialize_skips_defaults() {
        let schema = Schema::new()
            .with_class(ClassDef::new("Person").with_slots(["id"]))
            .with_slot(SlotDef::new("id").with_range("string").required().identifier());

        let value = schema.to_json_value().unwrap();
        assert_eq!(value["classes"]["Person"]["slots"][0], "id");
        assert!(value["classes"]["Person"].get("is_a").is_none());
        assert_eq!(value["slots"]["id"]["identifier"], true);
        assert!(value["slots"]["id"].get("multivalued").is_none());
        assert!(value.get("enums").is_none());
    }

    #[test]
    fn test_enum_serializes_as_mapping() {
        let schema = Schema::new().with_enum(EnumDef::new("Status", ["active", "inactive"]));
        let yaml = schema.to_yaml_string().unwrap();
        assert!(yaml.contains("permissible_values"));
        assert!(yaml.contains("active: {}"));
    }

    #[test]
    fn test_enum_keeps_value_bodies_and_extra_keys() {
        let mut status = EnumDef::new("Status", ["active"]);
        status.permissible_values.insert(
            "retired".to_string(),
            serde_json::json!({"description": "no longer in use", "meaning": "ex:Retired"}),
        );
        status
            .extra
            .insert("enum_uri".to_string(), Value::String("ex:Status".to_string()));

        let yaml = Schema::new().with_enum(status).to_yaml_string().unwrap();
        assert!(yaml.contains("enum_uri:"));
        assert!(yaml.contains("ex:Status"));
        assert!(yaml.contains("description: no longer in use"));
        assert!(yaml.contains("ex:Retired"));
        assert!(yaml.contains("active: {}"));
    }
}

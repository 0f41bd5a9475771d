//! Decoding a parsed mapping into a [`Schema`]
//!
//! The input is whatever a YAML or JSON parser produced. Empty bodies
//! (`Person:` with nothing under it) are accepted as empty definitions.
//! Anything else that is not a mapping where a mapping is expected is a
//! contract violation and is reported as [`SchemaError::InvalidFormat`].

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{ClassDef, EnumDef, Schema, SlotDef};
use crate::error::{Result, SchemaError};

impl Schema {
    /// Build a schema from an already-decoded document
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid("<root>", "schema document must be a mapping"))?;

        let mut schema = Schema::new();
        for (key, value) in root {
            match key.as_str() {
                "classes" => {
                    for (name, body) in entries(value, "classes")? {
                        let class = decode_class(name, body)?;
                        schema.classes.insert(name.clone(), class);
                    }
                }
                "slots" => {
                    for (name, body) in entries(value, "slots")? {
                        let slot = decode_slot(name, body, &format!("slots.{}", name))?;
                        schema.slots.insert(name.clone(), slot);
                    }
                }
                "enums" => {
                    for (name, body) in entries(value, "enums")? {
                        let enum_def = decode_enum(name, body)?;
                        schema.enums.insert(name.clone(), enum_def);
                    }
                }
                "types" => {
                    for (name, body) in entries(value, "types")? {
                        schema.types.insert(name.clone(), body.clone());
                    }
                }
                _ => {
                    schema.header.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(schema)
    }

    /// Parse YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(&value)
    }

    /// Parse JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Load a `.yaml`, `.yml` or `.json` file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_source(&content, path)
    }

    /// Decode `content` read from `path`, choosing the parser by extension
    /// (case-insensitive). Any other extension is [`SchemaError::UnsupportedFormat`].
    pub fn from_source(content: &str, path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(content),
            Some("json") => Self::from_json_str(content),
            other => Err(SchemaError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Iterate a mapping section; `null` counts as empty
fn entries<'a>(value: &'a Value, path: &str) -> Result<Vec<(&'a String, &'a Value)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map.iter().collect()),
        other => Err(SchemaError::invalid(
            path,
            format!("expected a mapping, found {}", kind_of(other)),
        )),
    }
}

/// Body of a definition; `null` counts as an empty mapping
fn body<'a>(value: &'a Value, path: &str) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(SchemaError::invalid(
            path,
            format!("expected a mapping, found {}", kind_of(other)),
        )),
    }
}

fn decode_class(name: &str, value: &Value) -> Result<ClassDef> {
    let path = format!("classes.{}", name);
    let mut class = ClassDef::new(name);
    let Some(map) = body(value, &path)? else {
        return Ok(class);
    };

    for (key, value) in map {
        let field_path = format!("{}.{}", path, key);
        match key.as_str() {
            "is_a" => class.is_a = optional_string(value, &field_path)?,
            "mixins" => class.mixins = string_list(value, &field_path)?,
            "slots" => class.slots = string_list(value, &field_path)?,
            "attributes" => {
                let mut attributes = IndexMap::new();
                for (slot_name, slot_body) in entries(value, &field_path)? {
                    let slot_path = format!("{}.{}", field_path, slot_name);
                    attributes.insert(slot_name.clone(), decode_slot(slot_name, slot_body, &slot_path)?);
                }
                class.attributes = attributes;
            }
            "description" => class.description = optional_string(value, &field_path)?,
            "abstract" => class.is_abstract = flag(value, &field_path)?,
            "mixin" => class.is_mixin = flag(value, &field_path)?,
            _ => {
                class.extra.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(class)
}

fn decode_slot(name: &str, value: &Value, path: &str) -> Result<SlotDef> {
    let mut slot = SlotDef::new(name);
    let Some(map) = body(value, path)? else {
        return Ok(slot);
    };

    for (key, value) in map {
        let field_path = format!("{}.{}", path, key);
        match key.as_str() {
            "range" => slot.range = optional_string(value, &field_path)?,
            "description" => slot.description = optional_string(value, &field_path)?,
            "required" => slot.required = flag(value, &field_path)?,
            "identifier" => slot.identifier = flag(value, &field_path)?,
            "multivalued" => slot.multivalued = flag(value, &field_path)?,
            _ => {
                slot.extra.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(slot)
}

fn decode_enum(name: &str, value: &Value) -> Result<EnumDef> {
    let path = format!("enums.{}", name);
    let mut enum_def = EnumDef::new(name, Vec::<String>::new());
    let Some(map) = body(value, &path)? else {
        return Ok(enum_def);
    };

    for (key, value) in map {
        let field_path = format!("{}.{}", path, key);
        match key.as_str() {
            "description" => enum_def.description = optional_string(value, &field_path)?,
            "permissible_values" => {
                enum_def.permissible_values = permissible_values(value, &field_path)?
            }
            _ => {
                enum_def.extra.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(enum_def)
}

/// Tokens with their bodies. A list form gives every token an empty body.
fn permissible_values(value: &Value, path: &str) -> Result<IndexMap<String, Value>> {
    let empty = || Value::Object(Map::new());
    match value {
        Value::Null => Ok(IndexMap::new()),
        Value::Object(tokens) => tokens
            .iter()
            .map(|(token, token_body)| -> Result<(String, Value)> {
                let token_path = format!("{}.{}", path, token);
                let token_body = match body(token_body, &token_path)? {
                    Some(map) => Value::Object(map.clone()),
                    None => empty(),
                };
                Ok((token.clone(), token_body))
            })
            .collect(),
        Value::Array(_) => Ok(string_list(value, path)?
            .into_iter()
            .map(|token| (token, empty()))
            .collect()),
        other => Err(SchemaError::invalid(
            path,
            format!("expected a mapping or list, found {}", kind_of(other)),
        )),
    }
}

fn optional_string(value: &Value, path: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(SchemaError::invalid(
            path,
            format!("expected a string, found {}", kind_of(other)),
        )),
    }
}

/// A list of names. A lone string is read as a one-element list.
fn string_list(value: &Value, path: &str) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SchemaError::invalid(
                        format!("{}[{}]", path, i),
                        format!("expected a string, found {}", kind_of(item)),
                    )
                })
            })
            .collect(),
        other => Err(SchemaError::invalid(
            path,
            format!("expected a list, found {}", kind_of(other)),
        )),
    }
}

fn flag(value: &Value, path: &str) -> Result<bool> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        other => Err(SchemaError::invalid(
            path,
            format!("expected a boolean, found {}", kind_of(other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

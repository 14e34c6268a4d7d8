//! Core types for compound document resolution.

use serde_json::Value;

/// Reserved record field holding a resource's relationship ids.
pub const LINKS_KEY: &str = "links";

/// Top-level key of the side-loaded resource table.
pub const LINKED_KEY: &str = "linked";

/// Field that identifies a record inside a linked collection.
pub const ID_KEY: &str = "id";

/// Descriptor field naming the singular target type of a relationship.
pub const TYPE_KEY: &str = "type";

/// Media type sent with every API request.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize an id value to the string used for lookups.
///
/// Strings and numbers are accepted, so `"1"` and `1` address the same
/// record. Anything else is not an id.
pub fn id_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Relationship target declared in a record's `links`.
///
/// Cardinality comes only from the shape of the value: an array is to-many,
/// a scalar is to-one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    One(String),
    Many(Vec<String>),
}

impl LinkTarget {
    /// Parse a link value.
    ///
    /// Returns `Ok(None)` for `null` (nothing linked) and `Err` with the
    /// offending JSON type name for values that cannot hold ids.
    pub fn parse(value: &Value) -> Result<Option<Self>, &'static str> {
        match value {
            Value::Null => Ok(None),
            Value::Array(items) => items
                .iter()
                .map(|item| id_key(item).ok_or_else(|| json_type_name(item)))
                .collect::<Result<Vec<_>, _>>()
                .map(|ids| Some(LinkTarget::Many(ids))),
            other => id_key(other)
                .map(|id| Some(LinkTarget::One(id)))
                .ok_or_else(|| json_type_name(other)),
        }
    }
}

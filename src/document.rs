//! Read-only view over a decoded compound document.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::inflector::pluralize;
use crate::types::{id_key, json_type_name, ID_KEY, LINKED_KEY, LINKS_KEY, TYPE_KEY};

/// A raw resource record.
pub type Record = Map<String, Value>;

/// Indexed view of a compound document.
///
/// Building the view indexes the `linked` table by collection and id and
/// resolves the `links` type map to plural collection names, so lookups
/// during resolution are constant time. The underlying value is borrowed and
/// never modified.
#[derive(Debug)]
pub struct CompoundDocument<'a> {
    root: &'a Map<String, Value>,
    link_types: HashMap<&'a str, String>,
    linked: HashMap<&'a str, HashMap<String, &'a Record>>,
}

impl<'a> CompoundDocument<'a> {
    /// Index a decoded document.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::InvalidDocument` if the root, the `links` type
    /// map or the `linked` table is not a JSON object.
    pub fn new(document: &'a Value) -> Result<Self, ResolveError> {
        let root = document
            .as_object()
            .ok_or_else(|| ResolveError::InvalidDocument {
                message: format!("expected object, got {}", json_type_name(document)),
            })?;

        Ok(Self {
            root,
            link_types: index_link_types(root)?,
            linked: index_linked(root)?,
        })
    }

    /// Records of a top-level collection.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::MissingCollection` if the document has no such
    /// key, or `ResolveError::InvalidCollection` if it isn't an array.
    pub fn collection(&self, name: &str) -> Result<&'a [Value], ResolveError> {
        let value = self
            .root
            .get(name)
            .ok_or_else(|| ResolveError::MissingCollection {
                collection: name.to_string(),
            })?;

        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ResolveError::InvalidCollection {
                collection: name.to_string(),
                actual: json_type_name(value).to_string(),
            })
    }

    /// Plural linked collection for `"<collection>.<association>"`, if mapped.
    pub fn link_type(&self, collection: &str, association: &str) -> Option<&str> {
        let key = format!("{collection}.{association}");
        self.link_types.get(key.as_str()).map(String::as_str)
    }

    /// Linked record of `collection` with the given id.
    pub fn linked_record(&self, collection: &str, id: &str) -> Option<&'a Record> {
        self.linked.get(collection)?.get(id).copied()
    }

    /// Returns true if the `linked` table has a collection called `collection`.
    pub fn has_linked_collection(&self, collection: &str) -> bool {
        self.linked.contains_key(collection)
    }
}

/// Map each dotted relationship key to its plural target collection.
///
/// Descriptors without a string `type` are left out: the association is then
/// simply unresolvable.
fn index_link_types(root: &Map<String, Value>) -> Result<HashMap<&str, String>, ResolveError> {
    let Some(links) = root.get(LINKS_KEY) else {
        return Ok(HashMap::new());
    };
    let links = links
        .as_object()
        .ok_or_else(|| ResolveError::InvalidDocument {
            message: format!(
                "\"{}\" must be an object, got {}",
                LINKS_KEY,
                json_type_name(links)
            ),
        })?;

    Ok(links
        .iter()
        .filter_map(|(key, descriptor)| {
            let singular = descriptor.get(TYPE_KEY)?.as_str()?;
            Some((key.as_str(), pluralize(singular)))
        })
        .collect())
}

/// Index the `linked` table by collection and record id.
///
/// Records without a usable id cannot be linked to and are skipped. When an
/// id repeats, the first record wins.
fn index_linked(
    root: &Map<String, Value>,
) -> Result<HashMap<&str, HashMap<String, &Record>>, ResolveError> {
    let Some(linked) = root.get(LINKED_KEY) else {
        return Ok(HashMap::new());
    };
    let linked = linked
        .as_object()
        .ok_or_else(|| ResolveError::InvalidDocument {
            message: format!(
                "\"{}\" must be an object, got {}",
                LINKED_KEY,
                json_type_name(linked)
            ),
        })?;

    let mut index = HashMap::with_capacity(linked.len());
    for (collection, records) in linked {
        let records = records
            .as_array()
            .ok_or_else(|| ResolveError::InvalidCollection {
                collection: format!("{LINKED_KEY}.{collection}"),
                actual: json_type_name(records).to_string(),
            })?;

        let mut by_id: HashMap<String, &Record> = HashMap::with_capacity(records.len());
        for record in records.iter().filter_map(Value::as_object) {
            if let Some(id) = record.get(ID_KEY).and_then(id_key) {
                by_id.entry(id).or_insert(record);
            }
        }
        index.insert(collection.as_str(), by_id);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "links": {
                "posts.author": { "href": "http://example.com/users/{posts.author}", "type": "user" },
                "posts.comments": { "type": "comments" },
                "posts.broken": { "href": "http://example.com" }
            },
            "posts": [{ "id": "1" }],
            "linked": {
                "users": [{ "id": "1", "name": "John" }, { "id": 2, "name": "Walter" }],
                "comments": [{ "id": "1", "body": "foo" }, { "body": "no id" }]
            }
        })
    }

    #[test]
    fn link_types_are_pluralized() {
        let value = document();
        let doc = CompoundDocument::new(&value).unwrap();

        assert_eq!(doc.link_type("posts", "author"), Some("users"));
        assert_eq!(doc.link_type("posts", "comments"), Some("comments"));
        assert_eq!(doc.link_type("posts", "broken"), None);
        assert_eq!(doc.link_type("comments", "author"), None);
    }

    #[test]
    fn linked_records_are_indexed_by_id() {
        let value = document();
        let doc = CompoundDocument::new(&value).unwrap();

        assert_eq!(doc.linked_record("users", "1").unwrap()["name"], "John");
        assert_eq!(doc.linked_record("users", "2").unwrap()["name"], "Walter");
        assert!(doc.linked_record("users", "3").is_none());
        assert!(doc.linked_record("people", "1").is_none());
        assert!(doc.has_linked_collection("users"));
        assert!(!doc.has_linked_collection("people"));
    }

    #[test]
    fn collection_lookup() {
        let value = document();
        let doc = CompoundDocument::new(&value).unwrap();

        assert_eq!(doc.collection("posts").unwrap().len(), 1);
        assert!(matches!(
            doc.collection("articles"),
            Err(ResolveError::MissingCollection { collection }) if collection == "articles"
        ));
        assert!(matches!(
            doc.collection("links"),
            Err(ResolveError::InvalidCollection { .. })
        ));
    }

    #[test]
    fn optional_sections_may_be_absent() {
        let value = json!({ "posts": [] });
        let doc = CompoundDocument::new(&value).unwrap();

        assert!(!doc.has_linked_collection("users"));
        assert_eq!(doc.link_type("posts", "author"), None);
    }

    #[test]
    fn rejects_non_object_sections() {
        assert!(matches!(
            CompoundDocument::new(&json!([])),
            Err(ResolveError::InvalidDocument { .. })
        ));
        assert!(matches!(
            CompoundDocument::new(&json!({ "links": [] })),
            Err(ResolveError::InvalidDocument { .. })
        ));
        assert!(matches!(
            CompoundDocument::new(&json!({ "linked": { "users": {} } })),
            Err(ResolveError::InvalidCollection { .. })
        ));
    }
}

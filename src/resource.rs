//! Resolved resource objects.

use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use crate::methods::ResourceMethods;
use crate::shape::Shape;
use crate::types::ID_KEY;

/// Value of a single field on a resolved resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Plain attribute copied from the raw record.
    Attribute(Value),
    /// Resolved to-one relationship.
    One(Arc<Resource>),
    /// Resolved to-many relationship, in link order.
    Many(Vec<Arc<Resource>>),
}

impl Field {
    /// Returns true for relationship fields.
    pub fn is_relationship(&self) -> bool {
        !matches!(self, Field::Attribute(_))
    }

    /// Encode as plain JSON, inlining related resources.
    pub fn to_value(&self) -> Value {
        match self {
            Field::Attribute(value) => value.clone(),
            Field::One(resource) => resource.to_value(),
            Field::Many(resources) => {
                Value::Array(resources.iter().map(|r| r.to_value()).collect())
            }
        }
    }
}

/// A resource with its attributes and resolved relationships.
///
/// Fields keep document order: attributes first, as they appeared in the
/// raw record, then relationships in the order the record linked them.
/// Equality compares kind and fields only; attached methods are ignored.
#[derive(Clone)]
pub struct Resource {
    collection: String,
    shape: Arc<Shape>,
    fields: Vec<(String, Field)>,
    methods: Option<Arc<dyn ResourceMethods>>,
}

impl Resource {
    pub(crate) fn new(
        collection: String,
        shape: Arc<Shape>,
        fields: Vec<(String, Field)>,
        methods: Option<Arc<dyn ResourceMethods>>,
    ) -> Self {
        Self {
            collection,
            shape,
            fields,
            methods,
        }
    }

    /// Resource kind derived from the collection name (e.g. `"Post"`).
    pub fn kind(&self) -> &str {
        self.shape.kind()
    }

    /// Collection the record was read from (e.g. `"posts"`).
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Registered shape of this resource.
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// The `id` attribute, if the record had one.
    pub fn id(&self) -> Option<&Value> {
        self.attribute(ID_KEY)
    }

    /// Field called `name`, attribute or relationship.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    /// Returns true if the resource has a field called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Attribute value, or `None` if absent or a relationship.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            Field::Attribute(value) => Some(value),
            _ => None,
        }
    }

    /// To-one related resource, or `None` if absent or not to-one.
    pub fn one(&self, name: &str) -> Option<&Resource> {
        match self.get(name)? {
            Field::One(resource) => Some(resource),
            _ => None,
        }
    }

    /// To-many related resources, or `None` if absent or not to-many.
    pub fn many(&self, name: &str) -> Option<&[Arc<Resource>]> {
        match self.get(name)? {
            Field::Many(resources) => Some(resources),
            _ => None,
        }
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(key, field)| (key.as_str(), field))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the resource has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Invoke a custom method registered for this resource's collection.
    ///
    /// Returns `None` when no methods are attached or `method` is unknown.
    pub fn call(&self, method: &str) -> Option<Value> {
        self.methods.as_ref()?.call(self, method)
    }

    /// Returns true if a custom method called `method` is attached.
    pub fn responds_to(&self, method: &str) -> bool {
        self.methods
            .as_ref()
            .map(|m| m.responds_to(method))
            .unwrap_or(false)
    }

    /// Encode as a JSON object with related resources inlined.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, field)| (key.clone(), field.to_value()))
            .collect();
        Value::Object(map)
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.fields == other.fields
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.shape.name());
        for (key, field) in &self.fields {
            match field {
                Field::Attribute(value) => s.field(key, value),
                Field::One(resource) => s.field(key, resource),
                Field::Many(resources) => s.field(key, resources),
            };
        }
        s.finish()
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Attribute(value) => value.serialize(serializer),
            Field::One(resource) => resource.serialize(serializer),
            Field::Many(resources) => {
                let mut seq = serializer.serialize_seq(Some(resources.len()))?;
                for resource in resources {
                    seq.serialize_element(resource.as_ref())?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in &self.fields {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::MethodTable;
    use crate::shape::ShapeRegistry;
    use serde_json::json;

    fn user(registry: &ShapeRegistry, id: &str, name: &str) -> Resource {
        Resource::new(
            "users".into(),
            registry.shape_for("User", ["id", "name"]),
            vec![
                ("id".into(), Field::Attribute(json!(id))),
                ("name".into(), Field::Attribute(json!(name))),
            ],
            None,
        )
    }

    #[test]
    fn accessors_distinguish_field_kinds() {
        let registry = ShapeRegistry::new();
        let author = Arc::new(user(&registry, "1", "John"));
        let post = Resource::new(
            "posts".into(),
            registry.shape_for("Post", ["id", "author", "readers"]),
            vec![
                ("id".into(), Field::Attribute(json!("1"))),
                ("author".into(), Field::One(Arc::clone(&author))),
                ("readers".into(), Field::Many(vec![author])),
            ],
            None,
        );

        assert_eq!(post.kind(), "Post");
        assert_eq!(post.collection(), "posts");
        assert_eq!(post.id(), Some(&json!("1")));
        assert_eq!(post.one("author").unwrap().attribute("name"), Some(&json!("John")));
        assert_eq!(post.many("readers").unwrap().len(), 1);
        assert!(post.attribute("author").is_none());
        assert!(post.one("readers").is_none());
        assert!(post.get("author").unwrap().is_relationship());
        assert_eq!(
            post.field_names().collect::<Vec<_>>(),
            ["id", "author", "readers"]
        );
    }

    #[test]
    fn to_value_inlines_relationships_in_order() {
        let registry = ShapeRegistry::new();
        let post = Resource::new(
            "posts".into(),
            registry.shape_for("Post", ["title", "author"]),
            vec![
                ("title".into(), Field::Attribute(json!("Hello"))),
                ("author".into(), Field::One(Arc::new(user(&registry, "1", "John")))),
            ],
            None,
        );

        let value = post.to_value();
        assert_eq!(
            value,
            json!({ "title": "Hello", "author": { "id": "1", "name": "John" } })
        );
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["title", "author"]);
        assert_eq!(serde_json::to_value(&post).unwrap(), value);
    }

    #[test]
    fn equality_ignores_methods() {
        let registry = ShapeRegistry::new();
        let plain = user(&registry, "1", "John");
        let mut with_methods = user(&registry, "1", "John");
        with_methods.methods = Some(Arc::new(MethodTable::new().method("x", |_| json!(1))));

        assert_eq!(plain, with_methods);
        assert_ne!(plain, user(&registry, "2", "John"));
    }

    #[test]
    fn call_dispatches_to_attached_methods() {
        let registry = ShapeRegistry::new();
        let mut john = user(&registry, "1", "John");
        assert_eq!(john.call("greeting"), None);

        let methods = MethodTable::new().method("greeting", |r| {
            json!(format!("hi {}", r.attribute("name").unwrap().as_str().unwrap()))
        });
        john.methods = Some(Arc::new(methods));

        assert!(john.responds_to("greeting"));
        assert_eq!(john.call("greeting"), Some(json!("hi John")));
        assert_eq!(john.call("missing"), None);
    }

    #[test]
    fn debug_uses_shape_name() {
        let registry = ShapeRegistry::new();
        let john = user(&registry, "1", "John");
        assert_eq!(
            format!("{john:?}"),
            r#"User { id: String("1"), name: String("John") }"#
        );
    }
}

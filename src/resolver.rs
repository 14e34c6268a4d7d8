//! Compound document resolution - turns a primary collection plus its
//! side-loaded `linked` table into a graph of [`Resource`]s.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::document::{CompoundDocument, Record};
use crate::error::ResolveError;
use crate::inflector::classify;
use crate::methods::ResourceMethods;
use crate::resource::{Field, Resource};
use crate::shape::ShapeRegistry;
use crate::types::{json_type_name, LinkTarget, LINKED_KEY, LINKS_KEY};

/// Maximum number of nested linked records followed from a primary record.
///
/// Links below this depth are omitted like any other unresolvable link.
pub const MAX_DEPTH: usize = 128;

/// Resolve the primary collection `collection` of a compound document.
///
/// Shorthand for `Mapper::new(collection).call(document)`.
///
/// # Errors
///
/// Returns `ResolveError::MissingCollection` if the document has no such
/// collection, or another `ResolveError` variant if the document is
/// structurally malformed. Relationships that cannot be resolved are left
/// out of the result and never cause an error.
pub fn resolve(document: &Value, collection: &str) -> Result<Vec<Resource>, ResolveError> {
    Mapper::new(collection).call(document)
}

/// Maps one primary collection of compound documents to resources.
///
/// ```
/// use jsonapi_client::{Mapper, MethodTable};
/// use serde_json::json;
///
/// let mapper = Mapper::new("resources")
///     .with_methods(MethodTable::new().method("custom_method", |_| json!("biz")));
///
/// let resources = mapper
///     .call(&json!({ "resources": [{ "property": "foo" }, { "property": "bar" }] }))
///     .unwrap();
///
/// assert_eq!(resources.len(), 2);
/// assert_eq!(resources[0].attribute("property"), Some(&json!("foo")));
/// assert_eq!(resources[0].call("custom_method"), Some(json!("biz")));
/// ```
pub struct Mapper {
    primary_resource: String,
    methods: HashMap<String, Arc<dyn ResourceMethods>>,
    shapes: Option<Arc<ShapeRegistry>>,
}

impl Mapper {
    /// Create a mapper for the `primary_resource` collection.
    pub fn new(primary_resource: impl Into<String>) -> Self {
        Self {
            primary_resource: primary_resource.into(),
            methods: HashMap::new(),
            shapes: None,
        }
    }

    /// Attach methods to resources of the primary collection.
    pub fn with_methods(self, methods: impl ResourceMethods + 'static) -> Self {
        let collection = self.primary_resource.clone();
        self.with_type_methods(collection, methods)
    }

    /// Attach methods to resources of any collection, primary or linked.
    pub fn with_type_methods(
        mut self,
        collection: impl Into<String>,
        methods: impl ResourceMethods + 'static,
    ) -> Self {
        self.methods.insert(collection.into(), Arc::new(methods));
        self
    }

    /// Attach already shared methods to resources of `collection`.
    pub fn with_shared_methods(
        mut self,
        collection: impl Into<String>,
        methods: Arc<dyn ResourceMethods>,
    ) -> Self {
        self.methods.insert(collection.into(), methods);
        self
    }

    /// Register shapes in `shapes` instead of the process-wide registry.
    pub fn with_shape_registry(mut self, shapes: Arc<ShapeRegistry>) -> Self {
        self.shapes = Some(shapes);
        self
    }

    /// Name of the primary collection.
    pub fn primary_resource(&self) -> &str {
        &self.primary_resource
    }

    /// Shape registry used by this mapper.
    pub fn shapes(&self) -> &ShapeRegistry {
        self.shapes.as_deref().unwrap_or_else(|| ShapeRegistry::global())
    }

    /// Resolve the primary collection of `document`.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn call(&self, document: &Value) -> Result<Vec<Resource>, ResolveError> {
        self.call_collection(document, &self.primary_resource)
    }

    /// Resolve an arbitrary top-level collection of `document`.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn call_collection(
        &self,
        document: &Value,
        collection: &str,
    ) -> Result<Vec<Resource>, ResolveError> {
        let document = CompoundDocument::new(document)?;
        let records = document.collection(collection)?;

        let mut resolution = Resolution::new(self, document);
        let resources = records
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let record = value.as_object().ok_or_else(|| ResolveError::InvalidRecord {
                    collection: collection.to_string(),
                    index,
                    actual: json_type_name(value).to_string(),
                })?;
                let label = format!("{collection}[{index}]");
                resolution.resolve_record(collection, &label, record)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(collection, count = resources.len(), "resolved collection");
        Ok(resources)
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut with_methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        with_methods.sort_unstable();
        f.debug_struct("Mapper")
            .field("primary_resource", &self.primary_resource)
            .field("methods", &with_methods)
            .finish()
    }
}

type RecordKey = (String, String);

/// State of one `call`.
///
/// Every linked `(collection, id)` is resolved at most once and shared, so
/// every path to the same record yields the same value. A link back to a
/// record still being resolved further up the stack is omitted, and so is
/// any link past [`MAX_DEPTH`]. `in_progress` holds exactly the chain of
/// linked records above the current one, so its size is the depth.
struct Resolution<'m, 'd> {
    mapper: &'m Mapper,
    document: CompoundDocument<'d>,
    resolved: HashMap<RecordKey, Arc<Resource>>,
    in_progress: HashSet<RecordKey>,
}

impl<'m, 'd> Resolution<'m, 'd> {
    fn new(mapper: &'m Mapper, document: CompoundDocument<'d>) -> Self {
        Self {
            mapper,
            document,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn resolve_record(
        &mut self,
        collection: &str,
        label: &str,
        record: &Record,
    ) -> Result<Resource, ResolveError> {
        let mut fields: Vec<(String, Field)> = record
            .iter()
            .filter(|(key, _)| key.as_str() != LINKS_KEY)
            .map(|(key, value)| (key.clone(), Field::Attribute(value.clone())))
            .collect();

        match record.get(LINKS_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::Object(links)) => {
                for (association, value) in links {
                    let target =
                        LinkTarget::parse(value).map_err(|actual| ResolveError::InvalidLinkValue {
                            record: label.to_string(),
                            association: association.clone(),
                            actual: actual.to_string(),
                        })?;
                    let Some(target) = target else {
                        continue;
                    };
                    if let Some(field) = self.resolve_link(collection, association, target)? {
                        set_field(&mut fields, association, field);
                    }
                }
            }
            Some(other) => {
                return Err(ResolveError::InvalidLinks {
                    record: label.to_string(),
                    actual: json_type_name(other).to_string(),
                })
            }
        }

        let kind = classify(collection);
        let shape = self
            .mapper
            .shapes()
            .shape_for(&kind, fields.iter().map(|(key, _)| key.as_str()));
        let methods = self.mapper.methods.get(collection).cloned();
        Ok(Resource::new(collection.to_string(), shape, fields, methods))
    }

    fn resolve_link(
        &mut self,
        collection: &str,
        association: &str,
        target: LinkTarget,
    ) -> Result<Option<Field>, ResolveError> {
        let Some(target_collection) = self.document.link_type(collection, association) else {
            return Ok(None);
        };
        let target_collection = target_collection.to_string();
        if !self.document.has_linked_collection(&target_collection) {
            return Ok(None);
        }

        match target {
            LinkTarget::One(id) => Ok(self.resolve_linked(&target_collection, &id)?.map(Field::One)),
            LinkTarget::Many(ids) => {
                let mut resources = Vec::with_capacity(ids.len());
                for id in &ids {
                    if let Some(resource) = self.resolve_linked(&target_collection, id)? {
                        resources.push(resource);
                    }
                }
                Ok(Some(Field::Many(resources)))
            }
        }
    }

    fn resolve_linked(
        &mut self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Arc<Resource>>, ResolveError> {
        let key = (collection.to_string(), id.to_string());
        if let Some(resource) = self.resolved.get(&key) {
            return Ok(Some(Arc::clone(resource)));
        }
        if self.in_progress.contains(&key) || self.in_progress.len() >= MAX_DEPTH {
            return Ok(None);
        }
        let Some(record) = self.document.linked_record(collection, id) else {
            return Ok(None);
        };

        self.in_progress.insert(key.clone());
        let label = format!("{LINKED_KEY}.{collection}[id={id}]");
        let resolved = self.resolve_record(collection, &label, record);
        self.in_progress.remove(&key);

        let resource = Arc::new(resolved?);
        self.resolved.insert(key, Arc::clone(&resource));
        Ok(Some(resource))
    }
}

/// Add a relationship field; a relationship replaces an attribute of the
/// same name in place.
fn set_field(fields: &mut Vec<(String, Field)>, name: &str, field: Field) {
    match fields.iter_mut().find(|(key, _)| key == name) {
        Some((_, existing)) => *existing = field,
        None => fields.push((name.to_string(), field)),
    }
}

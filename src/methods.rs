//! Caller-supplied behavior attached to resolved resources.
//!
//! A [`Mapper`](crate::Mapper) can carry a [`ResourceMethods`] implementation
//! per collection. Every resource resolved from that collection holds a
//! handle to it and dispatches [`Resource::call`](crate::Resource::call)
//! through it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::resource::Resource;

/// Named behavior available on resources of one collection.
pub trait ResourceMethods: Send + Sync {
    /// Invoke `method` on `resource`. Returns `None` if the method is unknown.
    fn call(&self, resource: &Resource, method: &str) -> Option<Value>;

    /// Returns true if `method` is defined.
    fn responds_to(&self, method: &str) -> bool;
}

type Method = Arc<dyn Fn(&Resource) -> Value + Send + Sync>;

/// Closure-backed [`ResourceMethods`].
///
/// ```
/// use jsonapi_client::MethodTable;
/// use serde_json::json;
///
/// let methods = MethodTable::new()
///     .method("custom_method", |_| json!("biz"))
///     .method("shout", |post| {
///         let title = post.attribute("title").and_then(|t| t.as_str()).unwrap_or("");
///         json!(title.to_uppercase())
///     });
/// assert!(methods.has("shout"));
/// ```
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, Method>,
}

impl MethodTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or replace) a method.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Resource) -> Value + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Returns true if `name` is defined.
    pub fn has(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Defined method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ResourceMethods for MethodTable {
    fn call(&self, resource: &Resource, method: &str) -> Option<Value> {
        self.methods.get(method).map(|f| f(resource))
    }

    fn responds_to(&self, method: &str) -> bool {
        self.has(method)
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.names())
            .finish()
    }
}

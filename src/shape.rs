//! Resource shapes: one named shape per distinct `(kind, field set)`.
//!
//! Documents carry arbitrary field sets, so two `Post` records may not have
//! the same fields. Each distinct sorted field set under a kind is registered
//! once and gets a stable name: the first shape of a kind is named after the
//! kind, later ones get a numeric suffix (`Post`, `Post2`, `Post3`, ...).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// A registered resource shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    kind: String,
    name: String,
    fields: Vec<String>,
}

impl Shape {
    /// Resource kind this shape belongs to (e.g. `"Post"`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Unique shape name within the registry (e.g. `"Post"` or `"Post2"`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sorted field names.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns true if the shape declares `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields
            .binary_search_by(|f| f.as_str().cmp(field))
            .is_ok()
    }
}

#[derive(Debug, Default)]
struct Registry {
    shapes: HashMap<(String, Vec<String>), Arc<Shape>>,
    per_kind: HashMap<String, usize>,
}

/// Thread-safe memo of resource shapes.
#[derive(Debug, Default)]
pub struct ShapeRegistry {
    inner: Mutex<Registry>,
}

impl ShapeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry shared by mappers that don't bring their own.
    pub fn global() -> &'static ShapeRegistry {
        static GLOBAL: OnceLock<ShapeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ShapeRegistry::new)
    }

    /// Return the shape for `kind` with the given field names, registering it
    /// on first use. Field order does not matter.
    pub fn shape_for<I, S>(&self, kind: &str, fields: I) -> Arc<Shape>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        fields.sort();
        fields.dedup();

        // A poisoned lock still holds a consistent map: entries are only
        // inserted after they are fully built.
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let key = (kind.to_string(), fields);
        if let Some(shape) = registry.shapes.get(&key) {
            return Arc::clone(shape);
        }

        let ordinal = registry.per_kind.entry(kind.to_string()).or_insert(0);
        *ordinal += 1;
        let name = if *ordinal == 1 {
            kind.to_string()
        } else {
            format!("{kind}{ordinal}")
        };

        let shape = Arc::new(Shape {
            kind: kind.to_string(),
            name,
            fields: key.1.clone(),
        });
        registry.shapes.insert(key, Arc::clone(&shape));
        shape
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .shapes
            .len()
    }

    /// Returns true if no shape has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

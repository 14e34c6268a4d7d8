//! JSON:API Client
//!
//! Resolution of JSON:API compound documents into linked resource graphs.
//!
//! A compound document carries a primary collection, a side-loaded `linked`
//! table and a `links` type map. Resolution replaces every relationship id in
//! a record's `links` with the linked resource it names, recursively.
//!
//! # Example
//!
//! ```
//! use jsonapi_client::resolve;
//! use serde_json::json;
//!
//! let document = json!({
//!     "links": {
//!         "posts.author": { "href": "http://example.com/users/{posts.author}", "type": "user" },
//!         "posts.comments": { "type": "comments" }
//!     },
//!     "posts": [{
//!         "id": "1",
//!         "links": { "author": "1", "comments": ["1", "2"] }
//!     }],
//!     "linked": {
//!         "users": [{ "id": "1", "name": "John" }],
//!         "comments": [{ "id": "1", "body": "foo" }, { "id": "2", "body": "bar" }]
//!     }
//! });
//!
//! let posts = resolve(&document, "posts").unwrap();
//! let author = posts[0].one("author").unwrap();
//!
//! assert_eq!(author.attribute("name"), Some(&json!("John")));
//! assert_eq!(posts[0].many("comments").unwrap().len(), 2);
//! assert!(posts[0].get("links").is_none());
//! ```
//!
//! # Resolution Rules
//!
//! | Link value | Result |
//! |------------|--------|
//! | `"id"` with a matching linked record | to-one field holding the resolved record |
//! | `["id", ...]` | to-many field, in id order, unmatched ids dropped (empty if none match) |
//! | no `"<collection>.<association>"` type mapping | field omitted |
//! | target collection or id missing | field omitted |
//! | `null` | field omitted |
//! | more than [`MAX_DEPTH`] linked records deep | field omitted |
//!
//! Only structural problems are errors, and a missing primary collection is
//! one of them ([`ResolveError::MissingCollection`]).

mod config;
#[cfg(feature = "remote")]
mod consumer;
mod definition;
mod document;
mod error;
pub mod inflector;
mod loader;
mod methods;
mod resolver;
mod resource;
mod shape;
mod types;
mod validator;

pub use config::{env_var, ConsumerConfig, DEFAULT_TIMEOUT};
pub use definition::ResourceDefinition;
pub use document::{CompoundDocument, Record};
pub use error::{ConfigError, LoadError, ResolveError, SchemaError, ValidateError};
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use methods::{MethodTable, ResourceMethods};
pub use resolver::{resolve, Mapper, MAX_DEPTH};
pub use resource::{Field, Resource};
pub use shape::{Shape, ShapeRegistry};
pub use types::{id_key, json_type_name, LinkTarget, MEDIA_TYPE};
pub use validator::{document_schema, validate_against_schema, validate_document};

#[cfg(feature = "remote")]
pub use consumer::{ApiResponse, Consumer};
#[cfg(feature = "remote")]
pub use error::{ClientError, FetchError};
#[cfg(feature = "remote")]
pub use loader::load_document_url;

//! Declarative per-resource registration.
//!
//! A [`ResourceDefinition`] names a primary collection, the environment
//! prefix of its API client and any custom methods, then lazily builds and
//! memoizes the matching [`Mapper`] and [`Consumer`](crate::Consumer).
//!
//! ```
//! use jsonapi_client::{MethodTable, ResourceDefinition};
//! use serde_json::json;
//!
//! let posts = ResourceDefinition::new("posts")
//!     .config_prefix("blog_api")
//!     .resource_methods(MethodTable::new().method("summary", |_| json!("...")));
//!
//! assert_eq!(posts.mapper().primary_resource(), "posts");
//! assert!(std::ptr::eq(posts.mapper(), posts.mapper()));
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::methods::ResourceMethods;
use crate::resolver::Mapper;

#[cfg(feature = "remote")]
use crate::consumer::Consumer;
#[cfg(feature = "remote")]
use crate::error::{ClientError, FetchError};
#[cfg(feature = "remote")]
use crate::resource::Resource;
#[cfg(feature = "remote")]
use tracing::{debug, instrument};

/// Registration of one resource type.
pub struct ResourceDefinition {
    resource: String,
    config_prefix: Option<String>,
    methods: Option<Arc<dyn ResourceMethods>>,
    mapper: OnceLock<Mapper>,
    #[cfg(feature = "remote")]
    api_client: OnceLock<Consumer>,
}

impl ResourceDefinition {
    /// Define the resource served as the `resource` collection.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            config_prefix: None,
            methods: None,
            mapper: OnceLock::new(),
            #[cfg(feature = "remote")]
            api_client: OnceLock::new(),
        }
    }

    /// Environment prefix of the API client (defaults to the resource name).
    pub fn config_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config_prefix = Some(prefix.into());
        self
    }

    /// Methods attached to every resolved resource of this type.
    pub fn resource_methods(mut self, methods: impl ResourceMethods + 'static) -> Self {
        self.methods = Some(Arc::new(methods));
        self
    }

    /// Name of the primary collection.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Environment prefix used by [`ResourceDefinition::api_client`].
    pub fn prefix(&self) -> &str {
        self.config_prefix.as_deref().unwrap_or(&self.resource)
    }

    /// The mapper for this resource, built on first use.
    pub fn mapper(&self) -> &Mapper {
        self.mapper.get_or_init(|| {
            let mapper = Mapper::new(self.resource.clone());
            match &self.methods {
                Some(methods) => {
                    mapper.with_shared_methods(self.resource.clone(), Arc::clone(methods))
                }
                None => mapper,
            }
        })
    }

    /// The API client for this resource, built from the environment on
    /// first successful use.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` while the environment is incomplete.
    #[cfg(feature = "remote")]
    pub fn api_client(&self) -> Result<&Consumer, ClientError> {
        if let Some(client) = self.api_client.get() {
            return Ok(client);
        }
        let client = Consumer::from_env(self.prefix())?;
        debug!(resource = %self.resource, prefix = self.prefix(), "api client configured");
        Ok(self.api_client.get_or_init(|| client))
    }

    /// Use `client` instead of configuring one from the environment.
    ///
    /// Returns the rejected client if one is already set.
    #[cfg(feature = "remote")]
    pub fn set_api_client(&self, client: Consumer) -> Result<(), Consumer> {
        self.api_client.set(client)
    }

    /// GET `path` and resolve the primary collection of the response.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the request fails, or
    /// `FetchError::Resolve` if the response is not a usable document.
    #[cfg(feature = "remote")]
    #[instrument(skip(self, params), fields(resource = %self.resource))]
    pub fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<Resource>, FetchError> {
        let response = self.api_client()?.get(path, params)?;
        Ok(self.mapper().call(&response.body)?)
    }
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("resource", &self.resource)
            .field("config_prefix", &self.config_prefix)
            .field("methods", &self.methods.is_some())
            .finish()
    }
}

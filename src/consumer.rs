//! HTTP transport for JSON:API endpoints.
//!
//! Requires the `remote` feature (enabled by default). The consumer only
//! moves documents: it sends requests with the JSON:API media type, turns
//! transport failures into [`ClientError`], and hands the decoded body back.
//! Resolution is left to [`Mapper`](crate::Mapper).

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ConsumerConfig;
use crate::error::ClientError;
use crate::loader::is_url;
use crate::types::MEDIA_TYPE;

/// Decoded response of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body for JSON content types, otherwise the raw body as a
    /// JSON string. An empty JSON body decodes to `null`.
    pub body: Value,
}

/// Blocking JSON:API client bound to one base URL.
#[derive(Debug, Clone)]
pub struct Consumer {
    config: ConsumerConfig,
    client: Client,
}

impl Consumer {
    /// Build a consumer from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` if the HTTP client cannot be built.
    pub fn new(config: ConsumerConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|source| ClientError::Request {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self { config, client })
    }

    /// Build a consumer configured by `<PREFIX>_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the environment is incomplete.
    pub fn from_env(prefix: &str) -> Result<Self, ClientError> {
        Self::new(ConsumerConfig::from_env(prefix)?)
    }

    /// Configuration this consumer was built with.
    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    /// Absolute URL for `path`.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged; anything else is
    /// joined to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if is_url(path) {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET `path`, appending `params` to any query already in it.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` for transport failures and non-2xx responses.
    #[instrument(skip(self, params))]
    pub fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(path);
        let request = self.client.get(&url).query(params);
        self.execute(request, url)
    }

    /// POST a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` for transport failures and non-2xx responses.
    #[instrument(skip(self, body))]
    pub fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(path);
        let request = self.client.post(&url).body(body.to_string());
        self.execute(request, url)
    }

    /// PUT a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` for transport failures and non-2xx responses.
    #[instrument(skip(self, body))]
    pub fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(path);
        let request = self.client.put(&url).body(body.to_string());
        self.execute(request, url)
    }

    fn execute(&self, request: RequestBuilder, url: String) -> Result<ApiResponse, ClientError> {
        let response = request.send().map_err(|e| translate(&url, e))?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "response received");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::ResourceNotFound { url });
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(is_json_content_type)
            .unwrap_or(false);
        let text = response.text().map_err(|e| translate(&url, e))?;

        let body = if !is_json {
            Value::String(text)
        } else if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ClientError::Parsing {
                url: url.clone(),
                message: e.to_string(),
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// True for `application/json`, `application/vnd.api+json` and friends.
fn is_json_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|media| media.trim().ends_with("json"))
        .unwrap_or(false)
}

/// Map a transport failure onto the client's error classes.
fn translate(url: &str, source: reqwest::Error) -> ClientError {
    let url = url.to_string();
    if source.is_timeout() {
        ClientError::Timeout { url, source }
    } else if source.is_connect() {
        ClientError::ConnectionFailed { url, source }
    } else if source.is_decode() {
        ClientError::Parsing {
            message: source.to_string(),
            url,
        }
    } else {
        ClientError::Request { url, source }
    }
}

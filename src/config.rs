//! Client configuration read from environment variables.
//!
//! A client named `resource_api` reads:
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `RESOURCE_API_BASE_URL` | yes | Base URL relative request paths are joined to |
//! | `RESOURCE_API_TIMEOUT_SECS` | no | Request timeout in seconds (default 10) |

use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a [`Consumer`](crate::Consumer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// Base URL relative request paths are joined to.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConsumerConfig {
    /// Create a config with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the config for `prefix` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariable` if `<PREFIX>_BASE_URL` is unset,
    /// or `ConfigError::InvalidVariable` if the timeout isn't a whole number.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |variable| std::env::var(variable).ok())
    }

    /// Read the config for `prefix` through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ConsumerConfig::from_env`].
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url_var = env_var(prefix, "base_url");
        let base_url = lookup(&base_url_var).ok_or(ConfigError::MissingVariable {
            variable: base_url_var,
        })?;

        let timeout_var = env_var(prefix, "timeout_secs");
        let timeout = match lookup(&timeout_var) {
            None => DEFAULT_TIMEOUT,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => {
                    return Err(ConfigError::InvalidVariable {
                        variable: timeout_var,
                        value,
                        message: e.to_string(),
                    })
                }
            },
        };

        Ok(Self { base_url, timeout })
    }
}

/// Environment variable name for `key` under `prefix` (`RESOURCE_API_BASE_URL`).
pub fn env_var(prefix: &str, key: &str) -> String {
    format!("{prefix}_{key}").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn env_var_is_upper_snake_case() {
        assert_eq!(env_var("resource_api", "base_url"), "RESOURCE_API_BASE_URL");
        assert_eq!(env_var("foo_api", "timeout_secs"), "FOO_API_TIMEOUT_SECS");
    }

    #[test]
    fn reads_base_url_and_default_timeout() {
        let config = ConsumerConfig::from_lookup(
            "resource_api",
            lookup(&[("RESOURCE_API_BASE_URL", "https://example.com/api")]),
        )
        .unwrap();

        assert_eq!(config, ConsumerConfig::new("https://example.com/api"));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn reads_timeout() {
        let config = ConsumerConfig::from_lookup(
            "resource_api",
            lookup(&[
                ("RESOURCE_API_BASE_URL", "https://example.com/api"),
                ("RESOURCE_API_TIMEOUT_SECS", " 30 "),
            ]),
        )
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_base_url_names_variable() {
        let result = ConsumerConfig::from_lookup("resource_api", lookup(&[]));
        assert_eq!(
            result,
            Err(ConfigError::MissingVariable {
                variable: "RESOURCE_API_BASE_URL".into()
            })
        );
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let result = ConsumerConfig::from_lookup(
            "resource_api",
            lookup(&[
                ("RESOURCE_API_BASE_URL", "https://example.com/api"),
                ("RESOURCE_API_TIMEOUT_SECS", "soon"),
            ]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidVariable { variable, value, .. })
                if variable == "RESOURCE_API_TIMEOUT_SECS" && value == "soon"
        ));
    }
}

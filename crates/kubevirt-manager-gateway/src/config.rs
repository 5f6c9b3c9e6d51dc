//! Gateway configuration types.
//!
//! This module defines configuration structures for the HTTP gateway.

use std::time::Duration;

use kubevirt_manager_core::DEFAULT_NAMESPACE;
use serde::Deserialize;

/// Configuration for the gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:9999").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// Namespace used when a request does not name one.
    #[serde(default = "GatewayConfig::default_namespace")]
    pub default_namespace: String,

    /// Allowed CORS origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:9999".to_string()
    }

    fn default_namespace() -> String {
        DEFAULT_NAMESPACE.to_string()
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `LISTEN_ADDR`, `DEFAULT_NAMESPACE` and `REQUEST_TIMEOUT_SECONDS`;
    /// unset or unparsable values keep their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(namespace) = std::env::var("DEFAULT_NAMESPACE") {
            if !namespace.is_empty() {
                config.default_namespace = namespace;
            }
        }
        if let Some(timeout) = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.request_timeout_seconds = timeout;
        }

        config
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Resolve the namespace of a request, falling back to the default.
    #[must_use]
    pub fn namespace_or_default<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(ns) if !ns.is_empty() => ns,
            _ => &self.default_namespace,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            default_namespace: Self::default_namespace(),
            cors_origins: vec!["*".to_string()],
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

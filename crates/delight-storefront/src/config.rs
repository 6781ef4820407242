//! Storefront configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the storefront's remote collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorefrontConfig {
    /// Base URL of the remote cart service.
    #[serde(default = "default_cart_service_url")]
    pub cart_service_url: String,
    /// Base URL of the payment gateway endpoints.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_cart_service_url() -> String {
    "https://fooddelight-back-end.onrender.com".to_string()
}

fn default_gateway_url() -> String {
    "https://fooddelight-back-end.onrender.com".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl StorefrontConfig {
    /// Create a configuration with the default endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cart service base URL.
    pub fn with_cart_service_url(mut self, url: impl Into<String>) -> Self {
        self.cart_service_url = url.into();
        self
    }

    /// Set the payment gateway base URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_service_url: default_cart_service_url(),
            gateway_url: default_gateway_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

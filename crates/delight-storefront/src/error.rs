//! Error types for remote cart and gateway operations.

use thiserror::Error;

/// Errors that can occur while talking to the cart service or the
/// payment gateway.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The remote service answered with a non-2xx status. The body is
    /// kept verbatim so callers can distinguish application errors
    /// (the cart service answers 400 with a message on duplicate adds).
    #[error("HTTP error: {status} for {url}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// Transport-level failure (connection, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A configured base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Domain invariant violation bubbled up from the commerce layer.
    #[error(transparent)]
    Commerce(#[from] delight_commerce::CommerceError),
}

impl StorefrontError {
    /// Whether this is the cart service's duplicate-item rejection.
    pub fn is_duplicate_item(&self) -> bool {
        matches!(self, StorefrontError::Http { status: 400, .. })
    }

    /// The application-level response body, when one exists.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            StorefrontError::Http { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

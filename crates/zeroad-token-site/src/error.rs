//! Error types for site setup.

use thiserror::Error;
use zeroad_token_core::{CoreError, WelcomeError};

/// Errors that can occur while building a site from its configuration.
///
/// Verification itself never errors; see [`crate::Rejection`].
#[derive(Debug, Error)]
pub enum SiteError {
    /// Client id or feature list unusable.
    #[error("invalid site identity: {0}")]
    Identity(#[from] WelcomeError),

    /// Key could not be imported.
    #[error("key error: {0}")]
    Key(#[from] CoreError),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for site operations.
pub type Result<T> = std::result::Result<T, SiteError>;

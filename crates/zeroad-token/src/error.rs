//! Error types for the facade.

use thiserror::Error;
use zeroad_token_core::{CoreError, DecodeError, WelcomeError};
use zeroad_token_site::{Rejection, SiteError};

/// Any error this crate's components can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Key handling error.
    #[error("key error: {0}")]
    Core(#[from] CoreError),

    /// Hello header could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Welcome header could not be built or parsed.
    #[error("welcome header error: {0}")]
    Welcome(#[from] WelcomeError),

    /// Site setup error.
    #[error("site error: {0}")]
    Site(#[from] SiteError),

    /// Token did not verify.
    #[error("token rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the token core.

use thiserror::Error;

/// Errors from key handling and signing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Structural failures while decoding an `X-Better-Web-Hello` value.
///
/// Every variant means "no usable token". None of them says anything about
/// the signature, which is only checked once decoding succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("header value is empty")]
    Empty,

    #[error("header value is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("expected 2 non-empty segments, got {0}")]
    SegmentCount(usize),

    #[error("segment {segment} is empty")]
    EmptySegment { segment: usize },

    #[error("segment {segment} is not valid base64")]
    InvalidBase64 { segment: usize },

    #[error("payload is {0} bytes, at least 13 are required")]
    PayloadTooShort(usize),
}

/// Failures while building or parsing the `X-Better-Web-Welcome` value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WelcomeError {
    #[error("client id must not be empty")]
    EmptyClientId,

    #[error("client id must not contain the '^' separator")]
    ClientIdContainsSeparator,

    #[error("at least one site feature must be provided")]
    NoFeatures,

    #[error("feature bits {0:#b} are not registered")]
    UnknownFeatureBits(u32),

    #[error("expected 3 '^'-separated parts, got {0}")]
    PartCount(usize),

    #[error("invalid protocol version: {0:?}")]
    InvalidVersion(String),

    #[error("invalid feature bitmask: {0:?}")]
    InvalidBitmask(String),
}

//! # Zero Ad Network Token Core
//!
//! Pure primitives for Zero Ad Network entitlement tokens: Ed25519 keys,
//! the binary wire codec for the `X-Better-Web-Hello` header, the unsigned
//! `X-Better-Web-Welcome` header, and the feature registry.
//!
//! This crate contains no I/O and no clock. Verification policy (expiry,
//! identity binding, feature gating) lives in `zeroad-token-site`.
//!
//! ## Key Types
//!
//! - [`Keypair`] / [`PublicKey`] - Ed25519 keys with the portable DER encoding
//! - [`ClientToken`] - A decoded, not yet verified, hello header
//! - [`TokenClaims`] - The fields an issuer signs into a hello header
//! - [`Feature`] / [`FeatureSet`] - Paid feature bundles and bitmasks
//! - [`Action`] / [`ActionContext`] - The verifier's total output record
//!
//! ## Wire format
//!
//! See the [`token`] module for the payload layout.

pub mod crypto;
pub mod error;
pub mod features;
pub mod protocol;
pub mod token;
pub mod welcome;

pub use crypto::{generate_keys, EncodedKeyPair, Keypair, PublicKey, Signature, NETWORK_PUBLIC_KEY};
pub use error::{CoreError, DecodeError, WelcomeError};
pub use features::{Action, ActionContext, Feature, FeatureSet};
pub use protocol::{cgi_header_name, ProtocolVersion, CLIENT_HEADER_NAME, SERVER_HEADER_NAME};
pub use token::{
    decode_client_header, encode_client_header, encode_client_header_with_nonce, ClientToken,
    TokenClaims, MAX_HEADER_LEN,
};
pub use welcome::{
    decode_welcome_header, encode_welcome_header, validate_client_id, WelcomeHeader,
};

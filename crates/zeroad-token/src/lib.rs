//! # Zero Ad Network Tokens
//!
//! Entitlement tokens for the Zero Ad Network "Better Web" protocol.
//!
//! ## Overview
//!
//! A browser extension sends a signed `X-Better-Web-Hello` header proving
//! that its user has paid for feature bundles. A participating site checks
//! the signature against the network's Ed25519 public key, checks expiry
//! and which site the token is bound to, and turns the features it has
//! subscribed to into a set of actions: hide ads, skip the paywall, and so
//! on. The site announces itself with an unsigned `X-Better-Web-Welcome`
//! header.
//!
//! ## Key Concepts
//!
//! - **Fail closed**: anything short of a valid token grants nothing.
//! - **Identity binding**: a token with a client id only works at that site.
//! - **Double gating**: granted = claimed by the token ∩ subscribed by the site.
//!
//! ## Usage
//!
//! ```rust
//! use zeroad_token::{Action, Feature, KeyStore, Site, SiteIdentity};
//!
//! # fn main() -> zeroad_token::Result<()> {
//! let key_store = KeyStore::new();
//! let identity = SiteIdentity::new("partner-001", [Feature::CleanWeb, Feature::OnePass])?;
//! let site = Site::new(identity, &key_store)?;
//!
//! assert_eq!(site.welcome_header_value(), "partner-001^1^3");
//!
//! // No hello header: nothing is granted.
//! let ctx = site.parse_client_token(None);
//! assert!(!ctx[Action::HideAdvertisements]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `zeroad_token::core` - Keys, wire codec, feature registry
//! - `zeroad_token::site` - Verification policy, site identity, key store, config

pub mod error;

// Re-export component crates
pub use zeroad_token_core as core;
pub use zeroad_token_site as site;

// Re-export main types for convenience
pub use error::{Error, Result};

pub use zeroad_token_core::{
    decode_client_header, decode_welcome_header, encode_client_header, encode_welcome_header,
    generate_keys, Action, ActionContext, ClientToken, EncodedKeyPair, Feature, FeatureSet,
    Keypair, ProtocolVersion, PublicKey, TokenClaims, CLIENT_HEADER_NAME, NETWORK_PUBLIC_KEY,
    SERVER_HEADER_NAME,
};
pub use zeroad_token_site::{
    parse_and_validate, verify_client_header, KeyStore, OutputMethod, Rejection, Site,
    SiteConfig, SiteIdentity, VerifiedToken, WelcomeOutput,
};

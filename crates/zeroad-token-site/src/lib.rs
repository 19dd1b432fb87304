//! # Zero Ad Network Token Site
//!
//! Site-side verification of `X-Better-Web-Hello` tokens.
//!
//! ## Overview
//!
//! A site is configured once with its client id and the features it has
//! opted into honouring. Every request's hello header is then evaluated
//! into an [`ActionContext`]: a total map from action identifier to bool
//! that downstream content logic switches on.
//!
//! Evaluation fails closed. A missing, malformed, forged, expired or
//! foreign token yields [`ActionContext::none`]. The typed
//! [`verify_client_header`] reports which [`Rejection`] applied, for
//! diagnostics.
//!
//! ## Key Concepts
//!
//! - **Identity binding**: a token carrying a client id is only valid at
//!   the site with that client id.
//! - **Double gating**: a feature is granted only if the token claims it
//!   *and* the site subscribes to it.
//! - **Key store**: imported keys are memoized in an injected [`KeyStore`],
//!   built once per process and shared between request handlers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zeroad_token_site::{KeyStore, SiteConfig};
//!
//! let key_store = KeyStore::new();
//! let config = SiteConfig::from_path("zeroad.json").unwrap();
//!
//! if let Some(site) = config.build_site(&key_store).unwrap() {
//!     let header_value: Option<&str> = None; // from the request
//!     let ctx = site.parse_client_token(header_value);
//!     assert!(!ctx.any());
//! }
//! ```

pub mod config;
pub mod error;
pub mod identity;
pub mod key_store;
pub mod site;
pub mod verifier;

pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use identity::SiteIdentity;
pub use key_store::KeyStore;
pub use site::{OutputMethod, Site, WelcomeOutput};
pub use verifier::{
    parse_and_validate, unix_now, verify_client_header, Rejection, VerifiedToken,
};

pub use zeroad_token_core::{Action, ActionContext, Feature, FeatureSet};

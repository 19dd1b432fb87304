//! Site configuration.
//!
//! ```json
//! {
//!   "enabled": true,
//!   "client_id": "partner-001",
//!   "features": ["CLEAN_WEB", "ONE_PASS"],
//!   "output_method": "header",
//!   "public_key": null
//! }
//! ```
//!
//! Every field is optional. A disabled or incomplete configuration builds
//! no site at all, which the host treats as "no token ever grants anything".

use std::path::Path;

use serde::{Deserialize, Serialize};
use zeroad_token_core::Feature;

use crate::error::Result;
use crate::identity::SiteIdentity;
use crate::key_store::KeyStore;
use crate::site::{OutputMethod, Site};

/// Configuration for one site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Whether the integration is switched on.
    pub enabled: bool,
    /// Client id issued at site registration.
    pub client_id: String,
    /// Features the site has opted into honouring.
    pub features: Vec<Feature>,
    /// How the welcome value is delivered.
    pub output_method: OutputMethod,
    /// Verification key override (SPKI DER, base64). Isolated and test
    /// deployments only; production sites verify against the network key.
    pub public_key: Option<String>,
}

impl SiteConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Whether enough is configured to build a site.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.client_id.is_empty() && !self.features.is_empty()
    }

    /// Build the site described by this configuration.
    ///
    /// Returns `Ok(None)` when the configuration is disabled or incomplete,
    /// and an error when it is active but invalid.
    pub fn build_site(&self, key_store: &KeyStore) -> Result<Option<Site>> {
        if !self.is_active() {
            tracing::debug!(
                enabled = self.enabled,
                features = self.features.len(),
                "site configuration inactive"
            );
            return Ok(None);
        }

        let mut identity =
            SiteIdentity::new(self.client_id.as_str(), self.features.iter().copied())?;
        if let Some(encoded) = &self.public_key {
            tracing::warn!("verifying client tokens with a public key override");
            identity = identity.with_public_key(key_store.public_key(encoded)?);
        }

        let site = Site::new(identity, key_store)?.with_output_method(self.output_method);
        tracing::info!(
            client_id = site.identity().client_id(),
            welcome = site.welcome_header_value(),
            "site configured"
        );
        Ok(Some(site))
    }
}

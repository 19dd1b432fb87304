//! The verifying site's own identity.

use zeroad_token_core::{
    validate_client_id, Feature, FeatureSet, ProtocolVersion, PublicKey, WelcomeError,
    WelcomeHeader,
};

use crate::error::Result;

/// Who a site is and which features it honours.
///
/// Loaded once from configuration and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    client_id: String,
    features: FeatureSet,
    public_key_override: Option<PublicKey>,
}

impl SiteIdentity {
    /// Create an identity.
    ///
    /// The client id must be non-empty and free of `^`, and at least one
    /// feature must be given.
    pub fn new(
        client_id: impl Into<String>,
        features: impl IntoIterator<Item = Feature>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        validate_client_id(&client_id)?;

        let features: FeatureSet = features.into_iter().collect();
        if features.is_empty() {
            return Err(WelcomeError::NoFeatures.into());
        }

        Ok(Self {
            client_id,
            features,
            public_key_override: None,
        })
    }

    /// Verify against `key` instead of the network key.
    ///
    /// Meant for isolated and test deployments only.
    pub fn with_public_key(mut self, key: PublicKey) -> Self {
        self.public_key_override = Some(key);
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The features this site has opted into honouring.
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    pub fn public_key_override(&self) -> Option<&PublicKey> {
        self.public_key_override.as_ref()
    }

    /// The welcome header announcing this identity.
    pub fn welcome_header(&self) -> WelcomeHeader {
        WelcomeHeader {
            client_id: self.client_id.clone(),
            version: ProtocolVersion::CURRENT,
            features: self.features,
        }
    }
}

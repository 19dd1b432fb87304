//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use zeroad_token_core::{encode_client_header, Feature, FeatureSet, Keypair, TokenClaims};
use zeroad_token_site::{unix_now, KeyStore, Site, SiteIdentity};

/// An issuer keypair and a site that verifies against it.
pub struct TestFixture {
    pub keypair: Keypair,
    pub key_store: KeyStore,
    pub site: Site,
}

impl TestFixture {
    /// A site subscribed to every feature, with a random issuer key.
    pub fn new(client_id: &str) -> Self {
        Self::build(Keypair::generate(), client_id, Feature::ALL)
    }

    /// A site subscribed to `features`, with a deterministic issuer key.
    pub fn with_seed(seed: [u8; 32], client_id: &str, features: &[Feature]) -> Self {
        Self::build(Keypair::from_seed(&seed), client_id, features.iter().copied())
    }

    fn build(
        keypair: Keypair,
        client_id: &str,
        features: impl IntoIterator<Item = Feature>,
    ) -> Self {
        let key_store = KeyStore::new();
        let public_key = key_store
            .public_key(&keypair.public_key().to_portable())
            .expect("fixture key imports");
        let identity = SiteIdentity::new(client_id, features)
            .expect("fixture identity is valid")
            .with_public_key(public_key);
        let site = Site::new(identity, &key_store).expect("fixture site builds");

        Self {
            keypair,
            key_store,
            site,
        }
    }

    /// A token for every feature, bound to this site, valid for `ttl` seconds.
    pub fn make_token(&self, ttl: u64) -> String {
        self.make_token_with(
            TokenClaims::new(expiry_in(ttl), FeatureSet::all())
                .client_id(self.site.identity().client_id()),
        )
    }

    /// A token for every feature, not bound to any site.
    pub fn make_unbound_token(&self, ttl: u64) -> String {
        self.make_token_with(TokenClaims::new(expiry_in(ttl), FeatureSet::all()))
    }

    /// Sign arbitrary claims with the fixture's issuer key.
    pub fn make_token_with(&self, claims: TokenClaims) -> String {
        encode_client_header(&claims, &self.keypair)
    }
}

/// Unix seconds `ttl` seconds from now.
pub fn expiry_in(ttl: u64) -> u32 {
    u32::try_from(unix_now() + ttl).unwrap_or(u32::MAX)
}

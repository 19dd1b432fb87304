//! Proptest generators for property-based testing.

use proptest::prelude::*;

use zeroad_token_core::{
    encode_client_header_with_nonce, Feature, FeatureSet, Keypair, PublicKey, TokenClaims,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a client id that is valid in a welcome header.
pub fn client_id() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,31}".prop_map(String::from)
}

/// Generate a registered feature.
pub fn feature() -> impl Strategy<Value = Feature> {
    prop_oneof![Just(Feature::CleanWeb), Just(Feature::OnePass)]
}

/// Generate a non-empty set of registered features.
pub fn site_features() -> impl Strategy<Value = FeatureSet> {
    prop::collection::vec(feature(), 1..=Feature::ALL.len())
        .prop_map(|features| features.into_iter().collect())
}

/// Generate any bitmask, unknown bits included.
pub fn claimed_features() -> impl Strategy<Value = FeatureSet> {
    any::<u32>().prop_map(FeatureSet::from_bits)
}

/// Generate an expiry strictly after `now`.
pub fn expires_after(now: u32) -> impl Strategy<Value = u32> {
    now.saturating_add(1)..=u32::MAX
}

/// Parameters for generating a signed hello header.
#[derive(Debug, Clone)]
pub struct ClaimsParams {
    pub keypair: Keypair,
    pub nonce: [u8; 4],
    pub claims: TokenClaims,
}

impl ClaimsParams {
    /// Sign the claims into a header value.
    pub fn encode(&self) -> String {
        encode_client_header_with_nonce(&self.claims, self.nonce, &self.keypair)
    }
}

impl Arbitrary for ClaimsParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(), // seed
            any::<[u8; 4]>(),  // nonce
            any::<u32>(),      // expires_at
            claimed_features(),
            prop::option::of(client_id()),
        )
            .prop_map(|(seed, nonce, expires_at, features, client_id)| {
                let mut claims = TokenClaims::new(expires_at, features);
                claims.client_id = client_id;
                ClaimsParams {
                    keypair: Keypair::from_seed(&seed),
                    nonce,
                    claims,
                }
            })
            .boxed()
    }
}

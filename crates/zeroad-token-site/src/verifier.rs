//! Token verification and policy evaluation.
//!
//! A hello header is checked in a fixed order, stopping at the first
//! failure:
//!
//! 1. decode the wire format
//! 2. the version byte must be supported
//! 3. the Ed25519 signature must verify over the payload
//! 4. the token must not have expired (`expires_at < now` is expired)
//! 5. a bound client id must equal the site's client id, byte for byte
//! 6. granted features = token features ∩ site features
//!
//! No field is trusted before step 3 passes. Any failure collapses to the
//! all-false [`ActionContext`]; there are no partial grants.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use zeroad_token_core::{
    decode_client_header, ActionContext, DecodeError, FeatureSet, ProtocolVersion, PublicKey,
};

use crate::identity::SiteIdentity;

/// Why a hello header did not produce a grant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No header, or an empty one.
    #[error("no token present")]
    Missing,

    #[error("malformed token: {0}")]
    Malformed(DecodeError),

    #[error("unsupported token version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired at {expires_at}, now is {now}")]
    Expired { expires_at: u32, now: u64 },

    /// The token is bound to another site's client id.
    #[error("token is bound to another client id")]
    IdentityMismatch,
}

impl From<DecodeError> for Rejection {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Empty => Rejection::Missing,
            other => Rejection::Malformed(other),
        }
    }
}

/// A token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub version: ProtocolVersion,
    /// Unix seconds.
    pub expires_at: u32,
    /// Features the token claims, unknown bits included.
    pub claimed: FeatureSet,
    /// Features granted at this site: claimed and subscribed.
    pub granted: FeatureSet,
    /// Whether the token was bound to this site's client id.
    pub bound: bool,
}

impl VerifiedToken {
    /// Expand the granted features into actions.
    pub fn actions(&self) -> ActionContext {
        ActionContext::from_features(self.granted)
    }
}

/// Verify a hello header for `site`, reporting why it was rejected.
///
/// `now` is the current time in unix seconds.
pub fn verify_client_header(
    header: Option<&str>,
    site: &SiteIdentity,
    public_key: &PublicKey,
    now: u64,
) -> Result<VerifiedToken, Rejection> {
    let header = header.ok_or(Rejection::Missing)?;
    let token = decode_client_header(header)?;

    let version = token
        .protocol_version()
        .ok_or(Rejection::UnsupportedVersion(token.version()))?;

    if !token.verify(public_key) {
        return Err(Rejection::InvalidSignature);
    }

    if u64::from(token.expires_at()) < now {
        return Err(Rejection::Expired {
            expires_at: token.expires_at(),
            now,
        });
    }

    let bound = match token.client_id() {
        Some(client_id) if client_id != site.client_id().as_bytes() => {
            return Err(Rejection::IdentityMismatch);
        }
        Some(_) => true,
        None => false,
    };

    Ok(VerifiedToken {
        version,
        expires_at: token.expires_at(),
        claimed: token.features(),
        granted: token.features().intersection(site.features()),
        bound,
    })
}

/// Evaluate a hello header into the action context for `site`.
///
/// Total and fail-closed: every input yields a full context, all `false`
/// unless the token verifies.
pub fn parse_and_validate(
    header: Option<&str>,
    site: &SiteIdentity,
    public_key: &PublicKey,
    now: u64,
) -> ActionContext {
    match verify_client_header(header, site, public_key, now) {
        Ok(token) => {
            tracing::trace!(
                granted = token.granted.bits(),
                bound = token.bound,
                "accepted client token"
            );
            token.actions()
        }
        Err(rejection) => {
            log_rejection(&rejection, header.map_or(0, str::len));
            ActionContext::none()
        }
    }
}

fn log_rejection(rejection: &Rejection, len: usize) {
    match rejection {
        Rejection::Missing => {}
        Rejection::Malformed(_) | Rejection::InvalidSignature => {
            tracing::warn!(%rejection, len, "could not decode client header value");
        }
        Rejection::UnsupportedVersion(_)
        | Rejection::Expired { .. }
        | Rejection::IdentityMismatch => {
            tracing::debug!(%rejection, "client token not honoured");
        }
    }
}

/// Current time in unix seconds. A clock set before 1970 reads as 0.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zeroad_token_core::{encode_client_header, Action, Feature, Keypair, TokenClaims};

    const NOW: u64 = 1_767_225_600;

    fn keypair() -> Keypair {
        Keypair::from_seed(&[0x42; 32])
    }

    fn site(client_id: &str, features: &[Feature]) -> SiteIdentity {
        SiteIdentity::new(client_id, features.iter().copied()).unwrap()
    }

    fn header(claims: TokenClaims) -> String {
        encode_client_header(&claims, &keypair())
    }

    fn valid_claims() -> TokenClaims {
        TokenClaims::new((NOW + 3600) as u32, FeatureSet::all()).client_id("partner-001")
    }

    #[test]
    fn test_full_grant() {
        let site = site("partner-001", &Feature::ALL);
        let value = header(valid_claims());

        let ctx = parse_and_validate(Some(&value), &site, &keypair().public_key(), NOW);
        for action in Action::ALL {
            assert!(ctx[action], "{action} should be enabled");
        }

        let token =
            verify_client_header(Some(&value), &site, &keypair().public_key(), NOW).unwrap();
        assert!(token.bound);
        assert_eq!(token.version, ProtocolVersion::V1);
        assert_eq!(token.granted, FeatureSet::all());
    }

    #[test]
    fn test_missing_header() {
        let site = site("partner-001", &Feature::ALL);
        let pk = keypair().public_key();

        assert_eq!(verify_client_header(None, &site, &pk, NOW), Err(Rejection::Missing));
        assert_eq!(verify_client_header(Some(""), &site, &pk, NOW), Err(Rejection::Missing));
        assert_eq!(parse_and_validate(None, &site, &pk, NOW), ActionContext::none());
    }

    #[test]
    fn test_malformed_header() {
        let site = site("partner-001", &Feature::ALL);
        let pk = keypair().public_key();

        let result = verify_client_header(Some("garbage"), &site, &pk, NOW);
        assert_eq!(result, Err(Rejection::Malformed(DecodeError::SegmentCount(1))));
    }

    #[test]
    fn test_wrong_key() {
        let site = site("partner-001", &Feature::ALL);
        let other = Keypair::from_seed(&[0x43; 32]).public_key();
        let value = header(valid_claims());

        let result = verify_client_header(Some(&value), &site, &other, NOW);
        assert_eq!(result, Err(Rejection::InvalidSignature));
    }

    #[test]
    fn test_unknown_version() {
        let site = site("partner-001", &Feature::ALL);
        let value = header(valid_claims().version(99));

        let result = verify_client_header(Some(&value), &site, &keypair().public_key(), NOW);
        assert_eq!(result, Err(Rejection::UnsupportedVersion(99)));
    }

    #[test]
    fn test_expiry_boundary() {
        let site = site("partner-001", &Feature::ALL);
        let pk = keypair().public_key();

        let expired = header(TokenClaims::new((NOW - 1) as u32, FeatureSet::all()));
        assert_eq!(
            verify_client_header(Some(&expired), &site, &pk, NOW),
            Err(Rejection::Expired {
                expires_at: (NOW - 1) as u32,
                now: NOW
            })
        );

        let at_now = header(TokenClaims::new(NOW as u32, FeatureSet::all()));
        assert!(verify_client_header(Some(&at_now), &site, &pk, NOW).is_ok());
    }

    #[test]
    fn test_identity_mismatch() {
        let pk = keypair().public_key();
        let value = header(valid_claims().client_id("A"));

        let result = verify_client_header(Some(&value), &site("B", &Feature::ALL), &pk, NOW);
        assert_eq!(result, Err(Rejection::IdentityMismatch));

        let ctx = parse_and_validate(Some(&value), &site("A", &Feature::ALL), &pk, NOW);
        assert!(ctx.any());
    }

    #[test]
    fn test_unbound_token_is_valid_anywhere() {
        let pk = keypair().public_key();
        let value = header(TokenClaims::new((NOW + 60) as u32, FeatureSet::all()));

        let token = verify_client_header(Some(&value), &site("anyone", &Feature::ALL), &pk, NOW)
            .unwrap();
        assert!(!token.bound);
    }

    #[test]
    fn test_double_gating() {
        let site = site("partner-001", &[Feature::CleanWeb]);
        let value = header(valid_claims());

        let ctx = parse_and_validate(Some(&value), &site, &keypair().public_key(), NOW);
        assert!(ctx[Action::HideAdvertisements]);
        assert!(!ctx[Action::DisableContentPaywall]);
        assert!(!ctx[Action::EnableSubscriptionAccess]);
    }

    #[test]
    fn test_unknown_bits_claimed_but_not_granted() {
        let site = site("partner-001", &Feature::ALL);
        let claims = TokenClaims::new((NOW + 60) as u32, FeatureSet::from_bits(0b1101));
        let value = header(claims);

        let token =
            verify_client_header(Some(&value), &site, &keypair().public_key(), NOW).unwrap();
        assert_eq!(token.claimed.bits(), 0b1101);
        assert_eq!(token.granted, Feature::CleanWeb.into());
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2023-11-14
        assert!(unix_now() > 1_700_000_000);
    }

    proptest! {
        #[test]
        fn test_arbitrary_header_never_grants(value in any::<String>(), now in any::<u64>()) {
            let site = site("partner-001", &Feature::ALL);
            let ctx = parse_and_validate(Some(&value), &site, &keypair().public_key(), now);
            prop_assert_eq!(ctx, ActionContext::none());
        }

        #[test]
        fn test_grant_never_exceeds_site_features(bits in any::<u32>(), ttl in 0u64..=3600) {
            let site = site("partner-001", &[Feature::OnePass]);
            let value = header(TokenClaims::new((NOW + ttl) as u32, FeatureSet::from_bits(bits)));

            let token =
                verify_client_header(Some(&value), &site, &keypair().public_key(), NOW).unwrap();
            prop_assert_eq!(token.claimed.bits(), bits);
            prop_assert_eq!(token.granted.bits() & !Feature::OnePass.bit(), 0);
        }
    }
}

//! The `X-Better-Web-Hello` wire codec.
//!
//! A header value is `base64(payload) "." base64(signature)`, where the
//! signature is a detached Ed25519 signature over the payload bytes and the
//! payload has this fixed layout (integers little-endian):
//!
//! | Offset | Size     | Field                                   |
//! |--------|----------|-----------------------------------------|
//! | 0      | 1        | version                                 |
//! | 1      | 4        | nonce (random, never interpreted)       |
//! | 5      | 4        | expires_at, u32 unix seconds            |
//! | 9      | 4        | feature bitmask, u32                    |
//! | 13     | variable | bound client id, UTF-8, rest of payload |
//!
//! The client id has no length prefix. A payload of exactly 13 bytes means
//! the token is not bound to any site.
//!
//! **CRITICAL**: This layout is FROZEN for protocol version 1. Browser
//! extensions and site verifiers implement it independently.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::RngCore;

use crate::crypto::{Keypair, PublicKey};
use crate::error::DecodeError;
use crate::features::FeatureSet;
use crate::protocol::ProtocolVersion;

/// Separator between the payload and signature segments.
pub const SEPARATOR: char = '.';

/// Longest header value accepted before any base64 work is done.
pub const MAX_HEADER_LEN: usize = 1024;

/// Fixed payload field offsets.
mod layout {
    pub const VERSION: usize = 0;
    pub const NONCE: usize = 1;
    pub const EXPIRES_AT: usize = 5;
    pub const FEATURES: usize = 9;
    pub const CLIENT_ID: usize = 13;

    pub const NONCE_LEN: usize = 4;
    pub const HEADER_LEN: usize = CLIENT_ID;
}

/// Decode one segment strictly.
///
/// The standard alphabet requires canonical padding. A segment containing
/// `-` or `_` uses the URL-safe alphabet, where padding may be left out
/// but must be complete when present.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let decoded = if !segment.contains(|c: char| c == '-' || c == '_') {
        STANDARD.decode(segment)
    } else if segment.ends_with('=') {
        URL_SAFE.decode(segment)
    } else {
        URL_SAFE_NO_PAD.decode(segment)
    };
    decoded.ok()
}

/// The fields an issuer signs into a hello header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub version: u8,
    pub expires_at: u32,
    pub features: FeatureSet,
    pub client_id: Option<String>,
}

impl TokenClaims {
    /// Claims for the current protocol version, not bound to a site.
    pub fn new(expires_at: u32, features: FeatureSet) -> Self {
        Self {
            version: ProtocolVersion::CURRENT.to_u8(),
            expires_at,
            features,
            client_id: None,
        }
    }

    /// Bind the token to one site's client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Override the version byte.
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Pack the payload bytes that get signed.
    pub fn to_payload(&self, nonce: [u8; 4]) -> Vec<u8> {
        let client_id = self.client_id.as_deref().unwrap_or_default().as_bytes();
        let mut payload = Vec::with_capacity(layout::HEADER_LEN + client_id.len());
        payload.push(self.version);
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&self.expires_at.to_le_bytes());
        payload.extend_from_slice(&self.features.bits().to_le_bytes());
        payload.extend_from_slice(client_id);
        payload
    }
}

/// Sign `claims` with a random nonce and return the header value.
pub fn encode_client_header(claims: &TokenClaims, keypair: &Keypair) -> String {
    let mut nonce = [0u8; layout::NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    encode_client_header_with_nonce(claims, nonce, keypair)
}

/// Sign `claims` with a caller-chosen nonce. Output is deterministic.
pub fn encode_client_header_with_nonce(
    claims: &TokenClaims,
    nonce: [u8; 4],
    keypair: &Keypair,
) -> String {
    let payload = claims.to_payload(nonce);
    let signature = keypair.sign(&payload);

    let mut out = STANDARD.encode(&payload);
    out.push(SEPARATOR);
    out.push_str(&STANDARD.encode(signature.as_bytes()));
    out
}

/// A decoded hello header whose signature has not been checked yet.
///
/// Nothing in here is trustworthy until [`ClientToken::verify`] passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientToken {
    version: u8,
    nonce: [u8; 4],
    expires_at: u32,
    features: FeatureSet,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl ClientToken {
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The version, if it is one this implementation supports.
    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        ProtocolVersion::from_u8(self.version)
    }

    pub fn nonce(&self) -> [u8; 4] {
        self.nonce
    }

    /// Expiry as unix seconds.
    pub fn expires_at(&self) -> u32 {
        self.expires_at
    }

    /// The claimed features, unknown bits included.
    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// The bound client id, or `None` for an unbound token.
    pub fn client_id(&self) -> Option<&[u8]> {
        let bytes = &self.payload[layout::CLIENT_ID..];
        (!bytes.is_empty()).then_some(bytes)
    }

    /// The signed payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The signature bytes as sent. Not necessarily 64 bytes long.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Check the signature over the payload.
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        public_key.verify(&self.payload, &self.signature)
    }
}

/// Decode a hello header value into its fields.
///
/// Only structure is checked here. Version, signature, expiry and binding
/// are the verifier's job.
pub fn decode_client_header(value: &str) -> Result<ClientToken, DecodeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DecodeError::Empty);
    }
    if value.len() > MAX_HEADER_LEN {
        return Err(DecodeError::TooLong {
            len: value.len(),
            max: MAX_HEADER_LEN,
        });
    }

    let segments: Vec<&str> = value.split(SEPARATOR).collect();
    let &[payload_b64, signature_b64] = segments.as_slice() else {
        return Err(DecodeError::SegmentCount(segments.len()));
    };
    for (segment, text) in [payload_b64, signature_b64].into_iter().enumerate() {
        if text.is_empty() {
            return Err(DecodeError::EmptySegment { segment });
        }
    }

    let payload = decode_segment(payload_b64).ok_or(DecodeError::InvalidBase64 { segment: 0 })?;
    let signature =
        decode_segment(signature_b64).ok_or(DecodeError::InvalidBase64 { segment: 1 })?;

    if payload.len() < layout::HEADER_LEN {
        return Err(DecodeError::PayloadTooShort(payload.len()));
    }

    let mut nonce = [0u8; layout::NONCE_LEN];
    nonce.copy_from_slice(&payload[layout::NONCE..layout::EXPIRES_AT]);

    Ok(ClientToken {
        version: payload[layout::VERSION],
        nonce,
        expires_at: read_u32_le(&payload, layout::EXPIRES_AT),
        features: FeatureSet::from_bits(read_u32_le(&payload, layout::FEATURES)),
        payload,
        signature,
    })
}

/// Caller guarantees `offset + 4 <= bytes.len()`.
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;
    use proptest::prelude::*;

    fn keypair() -> Keypair {
        Keypair::from_seed(&[0x42; 32])
    }

    #[test]
    fn test_known_header_bytes() {
        let claims =
            TokenClaims::new(1_767_225_600, FeatureSet::from_bits(0b11)).client_id("partner-001");
        let header = encode_client_header_with_nonce(&claims, [1, 2, 3, 4], &keypair());

        assert_eq!(
            header,
            "AQECAwQAuVVpAwAAAHBhcnRuZXItMDAx.qntGmgZo14BhoHCJwKYVxiuWncKckUDLd7bvsQtYY9ySzG3sZRAEKGGzF+LPyxLtSYMxEYhLxOxW2zGV5+mADQ=="
        );
    }

    #[test]
    fn test_payload_layout() {
        let claims =
            TokenClaims::new(0x0403_0201, FeatureSet::from_bits(0x0807_0605)).client_id("ab");
        let payload = claims.to_payload([0xaa, 0xbb, 0xcc, 0xdd]);

        assert_eq!(
            payload,
            vec![1, 0xaa, 0xbb, 0xcc, 0xdd, 1, 2, 3, 4, 5, 6, 7, 8, b'a', b'b']
        );
    }

    #[test]
    fn test_decode_roundtrip_bound() {
        let claims = TokenClaims::new(2_000_000_000, Feature::OnePass.into()).client_id("site-é");
        let header = encode_client_header_with_nonce(&claims, [9, 8, 7, 6], &keypair());
        let token = decode_client_header(&header).unwrap();

        assert_eq!(token.version(), 1);
        assert_eq!(token.protocol_version(), Some(ProtocolVersion::V1));
        assert_eq!(token.nonce(), [9, 8, 7, 6]);
        assert_eq!(token.expires_at(), 2_000_000_000);
        assert_eq!(token.features(), Feature::OnePass.into());
        assert_eq!(token.client_id(), Some("site-é".as_bytes()));
        assert!(token.verify(&keypair().public_key()));
    }

    #[test]
    fn test_decode_unbound_has_no_client_id() {
        let claims = TokenClaims::new(2_000_000_000, Feature::CleanWeb.into());
        let header = encode_client_header(&claims, &keypair());
        let token = decode_client_header(&header).unwrap();

        assert_eq!(token.payload().len(), 13);
        assert_eq!(token.client_id(), None);
    }

    #[test]
    fn test_decode_keeps_unknown_version() {
        let claims = TokenClaims::new(2_000_000_000, Feature::CleanWeb.into()).version(99);
        let header = encode_client_header(&claims, &keypair());
        let token = decode_client_header(&header).unwrap();

        assert_eq!(token.version(), 99);
        assert_eq!(token.protocol_version(), None);
    }

    #[test]
    fn test_decode_segment_errors() {
        assert_eq!(decode_client_header(""), Err(DecodeError::Empty));
        assert_eq!(decode_client_header("   "), Err(DecodeError::Empty));
        assert_eq!(decode_client_header("AAAA"), Err(DecodeError::SegmentCount(1)));
        assert_eq!(decode_client_header("AAAA.AAAA.AAAA"), Err(DecodeError::SegmentCount(3)));
        assert_eq!(decode_client_header(".AAAA"), Err(DecodeError::EmptySegment { segment: 0 }));
        assert_eq!(decode_client_header("AAAA."), Err(DecodeError::EmptySegment { segment: 1 }));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert_eq!(
            decode_client_header("!!!!.AAAA"),
            Err(DecodeError::InvalidBase64 { segment: 0 })
        );
        assert_eq!(
            decode_client_header("AQAAAAAAlDV3AQAAAA==.a+b_"),
            Err(DecodeError::InvalidBase64 { segment: 1 })
        );
        // Non-zero trailing bits are not canonical.
        assert_eq!(
            decode_client_header("AQAAAAAAlDV3AQAAAB==.AAAA"),
            Err(DecodeError::InvalidBase64 { segment: 0 })
        );
    }

    #[test]
    fn test_decode_rejects_short_payload() {
        // 12 bytes
        assert_eq!(
            decode_client_header("AAAAAAAAAAAAAAAA.AAAA"),
            Err(DecodeError::PayloadTooShort(12))
        );
    }

    #[test]
    fn test_decode_rejects_oversized_input() {
        let value = format!("{}.AAAA", "A".repeat(MAX_HEADER_LEN));
        assert!(matches!(
            decode_client_header(&value),
            Err(DecodeError::TooLong { .. })
        ));
    }

    #[test]
    fn test_decode_accepts_url_safe_alphabet() {
        let claims =
            TokenClaims::new(1_767_225_600, FeatureSet::from_bits(0b11)).client_id("partner-001");
        let header = encode_client_header_with_nonce(&claims, [1, 2, 3, 4], &keypair());
        let (payload, signature) = header.split_once(SEPARATOR).unwrap();
        assert!(signature.contains('+'));

        let url_safe_signature = signature.replace('+', "-").replace('/', "_");
        let padded = format!("{payload}.{url_safe_signature}");
        let unpadded = format!("{payload}.{}", url_safe_signature.trim_end_matches('='));

        let token = decode_client_header(&header).unwrap();
        assert_eq!(decode_client_header(&padded).unwrap(), token);
        assert_eq!(decode_client_header(&unpadded).unwrap(), token);
        assert!(token.verify(&keypair().public_key()));
    }

    #[test]
    fn test_decode_rejects_non_canonical_padding() {
        // Standard alphabet: padding is mandatory and must be complete.
        assert_eq!(
            decode_client_header("AQAAAAAAlDV3AQAAAA=.AAAA"),
            Err(DecodeError::InvalidBase64 { segment: 0 })
        );
        assert_eq!(
            decode_client_header("AQAAAAAAlDV3AQAAAA.AAAA"),
            Err(DecodeError::InvalidBase64 { segment: 0 })
        );
        assert_eq!(
            decode_client_header("AQAAAAAAlDV3AQAAAA===.AAAA"),
            Err(DecodeError::InvalidBase64 { segment: 0 })
        );

        // URL-safe alphabet: padding optional, but never partial.
        assert!(decode_client_header("AQAAAAAAlDV3AQAAAA==.-w==").is_ok());
        assert!(decode_client_header("AQAAAAAAlDV3AQAAAA==.-w").is_ok());
        assert_eq!(
            decode_client_header("AQAAAAAAlDV3AQAAAA==.-w="),
            Err(DecodeError::InvalidBase64 { segment: 1 })
        );
    }

    #[test]
    fn test_short_signature_decodes_but_fails_verification() {
        let token = decode_client_header("AQAAAAAAlDV3AQAAAA==.AAAA").unwrap();
        assert_eq!(token.signature().len(), 3);
        assert!(!token.verify(&keypair().public_key()));
    }

    proptest! {
        #[test]
        fn test_decode_is_total(value in ".{0,1100}") {
            if let Ok(token) = decode_client_header(&value) {
                prop_assert!(token.payload().len() >= layout::HEADER_LEN);
            }
        }

        #[test]
        fn test_decoded_fields_match_claims(
            nonce in any::<[u8; 4]>(),
            expires_at in any::<u32>(),
            bits in any::<u32>(),
            client_id in proptest::option::of(".{0,40}"),
        ) {
            let mut claims = TokenClaims::new(expires_at, FeatureSet::from_bits(bits));
            claims.client_id = client_id.filter(|id| !id.is_empty());
            let token =
                decode_client_header(&encode_client_header_with_nonce(&claims, nonce, &keypair()))
                    .unwrap();

            prop_assert_eq!(token.nonce(), nonce);
            prop_assert_eq!(token.expires_at(), expires_at);
            prop_assert_eq!(token.features().bits(), bits);
            prop_assert_eq!(
                token.client_id(),
                claims.client_id.as_deref().map(str::as_bytes)
            );
        }
    }
}

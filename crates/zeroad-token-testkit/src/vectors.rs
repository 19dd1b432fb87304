//! Golden test vectors for deterministic verification.
//!
//! Fixed seed, nonce and claims in; exact header bytes out. Any encoder or
//! verifier for the hello header must reproduce these byte for byte.

use zeroad_token_core::{
    decode_client_header, encode_client_header_with_nonce, FeatureSet, Keypair, TokenClaims,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Seed for deterministic key generation.
    pub seed: [u8; 32],
    pub nonce: [u8; 4],
    /// Unix seconds.
    pub expires_at: u32,
    /// Feature bitmask.
    pub features: u32,
    pub client_id: Option<&'static str>,
    /// Issuer public key, SPKI DER base64.
    pub expected_public_key: &'static str,
    /// Payload bytes (hex).
    pub expected_payload: &'static str,
    /// Complete header value.
    pub expected_header: &'static str,
}

impl GoldenVector {
    pub fn keypair(&self) -> Keypair {
        Keypair::from_seed(&self.seed)
    }

    pub fn claims(&self) -> TokenClaims {
        let mut claims = TokenClaims::new(self.expires_at, FeatureSet::from_bits(self.features));
        claims.client_id = self.client_id.map(str::to_owned);
        claims
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "Bound token with every feature",
            seed: [0x42; 32],
            nonce: [0x01, 0x02, 0x03, 0x04],
            expires_at: 1_767_225_600, // 2026-01-01T00:00:00Z
            features: 0b11,
            client_id: Some("partner-001"),
            expected_public_key: "MCowBQYDK2VwAyEAIVL40Zt5HSRFMkLhXy6rbLfP+ntqXtMAl5YOBpiB2xI=",
            expected_payload: "010102030400b9556903000000706172746e65722d303031",
            expected_header: "AQECAwQAuVVpAwAAAHBhcnRuZXItMDAx.\
                qntGmgZo14BhoHCJwKYVxiuWncKckUDLd7bvsQtYY9ySzG3sZRAEKGGzF+LPyxLtSYMxEYhLxOxW2zGV5+mADQ==",
        },
        GoldenVector {
            name: "Unbound clean web token",
            seed: [0x01; 32],
            nonce: [0x00; 4],
            expires_at: 2_000_000_000,
            features: 0b01,
            client_id: None,
            expected_public_key: "MCowBQYDK2VwAyEAiojj3XQJ8ZX9UtstPLpdcspnCb8dlBIb83SIAbQPb1w=",
            expected_payload: "01000000000094357701000000",
            expected_header: "AQAAAAAAlDV3AQAAAA==.\
                Z0t6J6FLB1n1uNyPJb+LWDBykn0dnuRVCKY4Hh3xqm0lrBjJQaAo0kw7H0VaGhyngNWWy3fe1KwJ/QMwFvFgDA==",
        },
        GoldenVector {
            name: "One pass token bound to a UTF-8 client id",
            seed: [0x07; 32],
            nonce: [0xde, 0xad, 0xbe, 0xef],
            expires_at: 4_102_444_800, // 2100-01-01T00:00:00Z
            features: 0b10,
            client_id: Some("café-ü"),
            expected_public_key: "MCowBQYDK2VwAyEA6kpsY+KcUgq+9VB7Ey7F+ZVHdq6+vnuSQh7qaRRG0iw=",
            expected_payload: "01deadbeef005786f402000000636166c3a92dc3bc",
            expected_header: "Ad6tvu8AV4b0AgAAAGNhZsOpLcO8.\
                LJ24x8qlv0v+UzohM0GYV4z0nxDP9FdPvtKjD7uavbjILcT1tjgFrSG3ULrubrZ0lvONc+Bl6s2McLLLQCV8CA==",
        },
    ]
}

/// Generate the header value for a vector.
pub fn generate_header_from_vector(vector: &GoldenVector) -> String {
    encode_client_header_with_nonce(&vector.claims(), vector.nonce, &vector.keypair())
}

/// Check every vector: public key, payload, header, and that the header
/// decodes and verifies. Returns the failures.
pub fn verify_all_vectors() -> Vec<(String, String)> {
    let mut failures = Vec::new();

    for vector in all_vectors() {
        let keypair = vector.keypair();

        let public_key = keypair.public_key().to_portable();
        if public_key != vector.expected_public_key {
            failures.push((
                vector.name.to_string(),
                format!("public key: expected {}, got {public_key}", vector.expected_public_key),
            ));
        }

        let payload = hex::encode(vector.claims().to_payload(vector.nonce));
        if payload != vector.expected_payload {
            failures.push((
                vector.name.to_string(),
                format!("payload: expected {}, got {payload}", vector.expected_payload),
            ));
        }

        let header = generate_header_from_vector(&vector);
        if header != vector.expected_header {
            failures.push((
                vector.name.to_string(),
                format!("header: expected {}, got {header}", vector.expected_header),
            ));
        }

        match decode_client_header(vector.expected_header) {
            Ok(token) if token.verify(&keypair.public_key()) => {}
            Ok(_) => failures.push((vector.name.to_string(), "signature rejected".into())),
            Err(e) => failures.push((vector.name.to_string(), format!("decode: {e}"))),
        }
    }

    failures
}

//! Cryptographic primitives: Ed25519 keys, signatures and their portable
//! encoding.
//!
//! Keys travel as base64 of their DER envelope: SPKI for public keys and
//! PKCS#8 for private keys. Import only looks at the trailing 32 bytes, so a
//! base64-encoded raw key imports as well.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use std::fmt;

use crate::error::CoreError;

/// The Zero Ad Network public key, in portable (SPKI, base64) form.
///
/// Every hello header issued by the network verifies against this key.
pub const NETWORK_PUBLIC_KEY: &str = "MCowBQYDK2VwAyEAignXRaTQtxEDl4ThULucKNQKEEO2Lo5bEO8qKwjSDVs=";

/// DER prefix of an Ed25519 SubjectPublicKeyInfo.
const SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// DER prefix of an Ed25519 PKCS#8 private key.
const PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];

const KEY_LEN: usize = 32;

/// Decode a portable key and return its trailing 32 bytes.
fn portable_key_bytes(encoded: &str) -> Result<Option<[u8; KEY_LEN]>, CoreError> {
    let der = STANDARD.decode(encoded.trim())?;
    if der.len() < KEY_LEN {
        return Ok(None);
    }
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&der[der.len() - KEY_LEN..]);
    Ok(Some(key))
}

/// An Ed25519 public key, already decompressed and ready to verify.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CoreError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| CoreError::InvalidPublicKey)
    }

    /// Import from the portable (SPKI, base64) encoding.
    pub fn from_portable(encoded: &str) -> Result<Self, CoreError> {
        let bytes = portable_key_bytes(encoded)?.ok_or(CoreError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    /// The Zero Ad Network key, see [`NETWORK_PUBLIC_KEY`].
    pub fn network() -> Result<Self, CoreError> {
        Self::from_portable(NETWORK_PUBLIC_KEY)
    }

    /// Get the raw bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Export in the portable (SPKI, base64) encoding.
    pub fn to_portable(&self) -> String {
        let mut der = Vec::with_capacity(SPKI_PREFIX.len() + KEY_LEN);
        der.extend_from_slice(&SPKI_PREFIX);
        der.extend_from_slice(self.0.as_bytes());
        STANDARD.encode(der)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.as_bytes())
    }

    /// Verify a detached signature over a message.
    ///
    /// Returns `false` for a signature of the wrong length instead of an
    /// error, so callers can feed it bytes straight off the wire.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match Signature::try_from(signature) {
            Ok(sig) => self.verify_signature(message, &sig).is_ok(),
            Err(_) => false,
        }
    }

    /// Verify a typed signature, reporting failure as an error.
    pub fn verify_signature(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        let sig = DalekSignature::from_bytes(&signature.0);
        self.0
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..16])
    }
}

/// A 64-byte detached Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 64] = slice.try_into().map_err(|_| CoreError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

/// A keypair for signing hello headers.
///
/// Only the issuing side holds one. Sites verify with a [`PublicKey`].
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Import from the portable (PKCS#8, base64) encoding.
    pub fn from_portable(encoded: &str) -> Result<Self, CoreError> {
        let seed = portable_key_bytes(encoded)?.ok_or(CoreError::InvalidPrivateKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Export in the portable (PKCS#8, base64) encoding.
    pub fn to_portable(&self) -> String {
        let mut der = Vec::with_capacity(PKCS8_PREFIX.len() + KEY_LEN);
        der.extend_from_slice(&PKCS8_PREFIX);
        der.extend_from_slice(&self.signing_key.to_bytes());
        STANDARD.encode(der)
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature(sig.to_bytes())
    }

    /// Get the raw seed bytes (secret key material).
    pub fn seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

/// A freshly generated keypair in portable form.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedKeyPair {
    /// PKCS#8 DER, base64.
    pub private_key: String,
    /// SPKI DER, base64.
    pub public_key: String,
}

impl fmt::Debug for EncodedKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedKeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Draw a random 32-byte seed and return the derived keypair, portable.
pub fn generate_keys() -> EncodedKeyPair {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut seed);
    let keypair = Keypair::from_seed(&seed);
    EncodedKeyPair {
        private_key: keypair.to_portable(),
        public_key: keypair.public_key().to_portable(),
    }
}

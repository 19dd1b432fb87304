//! Memoized key import.
//!
//! Importing a portable key means base64 decoding and decompressing an
//! Edwards point. The [`KeyStore`] does that once per distinct encoded key
//! and hands out copies afterwards. It is built once at process start and
//! shared by reference (or `Arc`) between request handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use zeroad_token_core::{Keypair, PublicKey, NETWORK_PUBLIC_KEY};

use crate::error::Result;

/// Read-through cache of imported keys, keyed by their portable encoding.
///
/// Entries are only ever inserted, never replaced or removed. Two threads
/// importing the same unseen key both derive it; the first insert wins and
/// both results are identical.
#[derive(Default)]
pub struct KeyStore {
    public_keys: RwLock<HashMap<String, PublicKey>>,
    keypairs: RwLock<HashMap<String, Keypair>>,
}

impl KeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a public key (SPKI DER, base64).
    pub fn public_key(&self, encoded: &str) -> Result<PublicKey> {
        if let Some(key) = self
            .public_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(encoded)
        {
            return Ok(*key);
        }

        let key = PublicKey::from_portable(encoded)?;
        let mut keys = self
            .public_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(*keys.entry(encoded.to_owned()).or_insert(key))
    }

    /// The Zero Ad Network public key.
    pub fn network_key(&self) -> Result<PublicKey> {
        self.public_key(NETWORK_PUBLIC_KEY)
    }

    /// Import a signing keypair (PKCS#8 DER, base64).
    pub fn keypair(&self, encoded: &str) -> Result<Keypair> {
        if let Some(keypair) = self
            .keypairs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(encoded)
        {
            return Ok(keypair.clone());
        }

        let keypair = Keypair::from_portable(encoded)?;
        let mut keypairs = self.keypairs.write().unwrap_or_else(PoisonError::into_inner);
        Ok(keypairs.entry(encoded.to_owned()).or_insert(keypair).clone())
    }

    /// Number of cached keys of both kinds.
    pub fn len(&self) -> usize {
        let public = self
            .public_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let private = self.keypairs.read().unwrap_or_else(PoisonError::into_inner).len();
        public + private
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let public = self
            .public_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        let private = self.keypairs.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("KeyStore")
            .field("public_keys", &public)
            .field("keypairs", &private)
            .finish()
    }
}

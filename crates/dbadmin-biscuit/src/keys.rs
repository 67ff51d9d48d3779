//! Keypair management for access tokens.

use crate::error::BiscuitError;
use biscuit_auth::{Algorithm, KeyPair as BiscuitKeyPair, PrivateKey, PublicKey};
use dbadmin_core::AuthConfig;
use rand::RngCore;
use std::path::Path;

/// An Ed25519 keypair for signing and verifying access tokens.
pub struct KeyPair {
    inner: BiscuitKeyPair,
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self::from_private_key(self.inner.private())
    }
}

/// Where the signing key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Read from the configured environment variable or file.
    Configured,
    /// Generated at startup; tokens do not survive a restart.
    Ephemeral,
}

impl KeyPair {
    /// Generate a new random keypair.
    pub fn generate() -> Result<Self, BiscuitError> {
        let mut rng = rand::rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        let private_key = PrivateKey::from_bytes(&bytes, Algorithm::Ed25519)
            .map_err(|e| BiscuitError::MalformedKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let inner = BiscuitKeyPair::from(&private_key);
        Self { inner }
    }

    /// Load a keypair from a hex-encoded private key string.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, BiscuitError> {
        let private_key = PrivateKey::from_bytes_hex(hex.trim(), Algorithm::Ed25519)
            .map_err(|e| BiscuitError::MalformedKey(e.to_string()))?;
        Ok(Self::from_private_key(private_key))
    }

    /// Use the configured signing key, or generate one if none is configured.
    pub fn resolve(config: &AuthConfig) -> Result<(Self, KeyOrigin), BiscuitError> {
        match config.resolve_private_key()? {
            Some(hex) => Ok((Self::from_private_key_hex(&hex)?, KeyOrigin::Configured)),
            None => Ok((Self::generate()?, KeyOrigin::Ephemeral)),
        }
    }

    pub fn inner(&self) -> &BiscuitKeyPair {
        &self.inner
    }

    pub fn public_key(&self) -> PublicKey {
        self.inner.public()
    }

    pub fn private_key_hex(&self) -> String {
        self.inner.private().to_bytes_hex()
    }

    pub fn public_key_hex(&self) -> String {
        self.inner.public().to_bytes_hex()
    }

    /// Write the private key as hex.
    pub fn save_private_key(&self, path: &Path) -> Result<(), BiscuitError> {
        std::fs::write(path, self.private_key_hex())?;
        Ok(())
    }

    /// Load a keypair from a private key file.
    pub fn load_from_file(private_key_path: &Path) -> Result<Self, BiscuitError> {
        let hex = std::fs::read_to_string(private_key_path)?;
        Self::from_private_key_hex(&hex)
    }
}

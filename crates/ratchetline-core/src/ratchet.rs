//! Symmetric ratchet for forward-secure cipher key derivation
//!
//! # Security Properties
//!
//! - Forward Secrecy: the root key is replaced on every step and the old one
//!   cannot be recomputed from the new one
//! - Determinism: the same starting root key always yields the same cipher
//!   key sequence, which is what keeps sender and receiver in agreement
//! - Atomicity: a step either replaces the root key and increments the
//!   counter together, or changes nothing

use std::fmt;

use ratchetline_crypto::{CryptoError, CryptoProvider};
use zeroize::Zeroize;

use crate::error::RatchetError;

/// Domain-separation tag signed to derive a cipher key
pub const CIPHER_KEY_TAG: u8 = 0x01;

/// Domain-separation tag signed to derive the next root key
pub const ROOT_KEY_TAG: u8 = 0x02;

/// Size of a cipher key (HMAC-SHA-256 output)
pub const CIPHER_KEY_SIZE: usize = 32;

/// Key material produced by one ratchet step.
///
/// Expanded into AES key, HMAC key and IV, then discarded. Zeroized on drop.
#[derive(Clone)]
pub struct CipherKey {
    key: [u8; CIPHER_KEY_SIZE],
    counter: u32,
}

impl CipherKey {
    /// Raw 32-byte key material.
    pub fn key(&self) -> &[u8; CIPHER_KEY_SIZE] {
        &self.key
    }

    /// Ratchet counter this key was derived at.
    pub fn counter(&self) -> u32 {
        self.counter
    }
}

impl Drop for CipherKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherKey").field("counter", &self.counter).finish_non_exhaustive()
    }
}

/// A derived but not yet committed ratchet step.
pub(crate) struct Step<K> {
    pub(crate) cipher_key: CipherKey,
    next_root_key: K,
}

/// Forward-secure symmetric ratchet ("chain key" in Double Ratchet terms).
///
/// Each [`click()`](Self::click):
/// 1. Signs [`CIPHER_KEY_TAG`] with the root key to get the cipher key
/// 2. Signs [`ROOT_KEY_TAG`] with the root key and imports the result as
///    the next root key
/// 3. Replaces the root key and increments the counter
///
/// Nothing is committed until both derivations and the import succeed.
pub struct SymmetricRatchet<P: CryptoProvider> {
    provider: P,
    root_key: P::Key,
    counter: u32,
}

impl<P: CryptoProvider> SymmetricRatchet<P> {
    /// Create a ratchet at counter 0 from an HMAC root key handle.
    pub fn new(provider: P, root_key: P::Key) -> Self {
        Self { provider, root_key, counter: 0 }
    }

    /// Create a ratchet by importing raw root key bytes.
    pub fn from_secret(provider: P, secret: &[u8]) -> Result<Self, RatchetError> {
        let root_key = provider.import_hmac_key(secret)?;
        Ok(Self::new(provider, root_key))
    }

    /// Number of steps taken so far.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Provider this ratchet derives keys with.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Advance one step and return the cipher key for the current counter.
    pub fn click(&mut self) -> Result<CipherKey, RatchetError> {
        let step = self.derive_step()?;
        Ok(self.commit(step))
    }

    /// Derive the next step without touching state.
    pub(crate) fn derive_step(&self) -> Result<Step<P::Key>, RatchetError> {
        if self.counter == u32::MAX {
            return Err(RatchetError::CounterOverflow { current: self.counter });
        }

        let cipher_key = self.provider.sign(&self.root_key, &[CIPHER_KEY_TAG])?;
        let next_root = self.provider.sign(&self.root_key, &[ROOT_KEY_TAG])?;
        let next_root_key = self.provider.import_hmac_key(&next_root)?;

        let key = <[u8; CIPHER_KEY_SIZE]>::try_from(cipher_key.as_slice()).map_err(|_| {
            CryptoError::InvalidKeyLength { expected: CIPHER_KEY_SIZE, actual: cipher_key.len() }
        })?;

        Ok(Step { cipher_key: CipherKey { key, counter: self.counter }, next_root_key })
    }

    /// Replace the root key and increment the counter.
    pub(crate) fn commit(&mut self, step: Step<P::Key>) -> CipherKey {
        let Step { cipher_key, next_root_key } = step;

        self.root_key = next_root_key;
        self.counter += 1;
        tracing::trace!(counter = self.counter, "ratchet advanced");

        cipher_key
    }
}

impl<P: CryptoProvider> fmt::Debug for SymmetricRatchet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricRatchet").field("counter", &self.counter).finish_non_exhaustive()
    }
}

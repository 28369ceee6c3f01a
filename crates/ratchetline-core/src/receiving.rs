//! Receiving chain: out-of-order decryption through a skipped-key cache

use ratchetline_crypto::CryptoProvider;

use crate::{
    config::ChainConfig,
    error::RatchetError,
    message::CipherMessage,
    message_keys::derive_message_keys,
    ratchet::{CipherKey, SymmetricRatchet},
};

/// Decrypt-only view of a symmetric ratchet with a skipped-key cache.
///
/// Every cipher key the ratchet produces is kept, indexed by counter, so
/// messages can be decrypted in any order.
///
/// # Invariants
///
/// - `cached_keys() == counter()`: the cache holds exactly the keys for
///   counters `0..counter()`
/// - The cache is append-only; keys are never evicted
/// - A request more than `max_skip` past the current counter is rejected
///   before any state changes
pub struct ReceivingChain<P: CryptoProvider> {
    ratchet: SymmetricRatchet<P>,
    keys: Vec<CipherKey>,
    config: ChainConfig,
}

impl<P: CryptoProvider> ReceivingChain<P> {
    /// Create a receiving chain from an HMAC root key handle.
    pub fn new(provider: P, root_key: P::Key, config: ChainConfig) -> Self {
        Self { ratchet: SymmetricRatchet::new(provider, root_key), keys: Vec::new(), config }
    }

    /// Create a receiving chain by importing raw root key bytes.
    pub fn from_secret(
        provider: P,
        secret: &[u8],
        config: ChainConfig,
    ) -> Result<Self, RatchetError> {
        Ok(Self {
            ratchet: SymmetricRatchet::from_secret(provider, secret)?,
            keys: Vec::new(),
            config,
        })
    }

    /// Number of steps the underlying ratchet has taken.
    pub fn counter(&self) -> u32 {
        self.ratchet.counter()
    }

    /// Number of cipher keys held in the cache.
    pub fn cached_keys(&self) -> usize {
        self.keys.len()
    }

    /// Configuration this chain enforces.
    pub fn config(&self) -> ChainConfig {
        self.config
    }

    /// Cipher key for `counter`, advancing and caching as needed.
    ///
    /// Counters already reached are served from the cache. Counters ahead
    /// of the ratchet advance it through every intermediate step and cache
    /// each key, up to `max_skip` steps past the current counter.
    ///
    /// Each step commits individually: if the provider fails part way, the
    /// keys derived so far stay cached and the chain remains consistent.
    ///
    /// # Errors
    ///
    /// - `SkippedMessageLimitExceeded` if `counter` is more than `max_skip`
    ///   ahead of the current counter
    /// - `CounterOverflow` if the ratchet cannot advance further
    pub fn get_key(&mut self, counter: u32) -> Result<CipherKey, RatchetError> {
        let index = counter as usize;
        if let Some(key) = self.keys.get(index) {
            return Ok(key.clone());
        }

        // Cache covers 0..current, so counter >= current here
        let current = self.ratchet.counter();
        let skip = counter - current;
        if skip > self.config.max_skip {
            tracing::warn!(
                current,
                requested = counter,
                max_skip = self.config.max_skip,
                "rejected counter beyond skipped message limit"
            );
            return Err(RatchetError::SkippedMessageLimitExceeded {
                current,
                requested: counter,
                max_skip: self.config.max_skip,
            });
        }

        if skip > 0 {
            tracing::debug!(current, requested = counter, skip, "caching skipped message keys");
        }

        while self.ratchet.counter() <= counter {
            let key = self.ratchet.click()?;
            self.keys.push(key);
        }

        let Some(key) = self.keys.get(index) else {
            unreachable!("cache holds every key below the ratchet counter");
        };
        Ok(key.clone())
    }

    /// Decrypt a message produced at `counter` by the matching sending
    /// chain.
    ///
    /// # Errors
    ///
    /// - `Crypto(DecryptionFailed)` if the cipher-text was tampered with or
    ///   `counter` is not the one it was encrypted at. Not retried.
    /// - Any error from [`get_key`](Self::get_key)
    pub fn decrypt(
        &mut self,
        message: &[u8],
        counter: u32,
    ) -> Result<CipherMessage<P::Key>, RatchetError> {
        let cipher_key = self.get_key(counter)?;
        let provider = self.ratchet.provider();

        let keys = derive_message_keys(provider, &cipher_key)?;
        let plaintext = provider
            .decrypt(&keys.aes_key, message, &keys.iv)
            .inspect_err(|err| tracing::debug!(counter, %err, "message decryption failed"))?;

        Ok(CipherMessage { counter, payload: plaintext, hmac_key: keys.hmac_key })
    }
}

impl<P: CryptoProvider> std::fmt::Debug for ReceivingChain<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceivingChain")
            .field("counter", &self.counter())
            .field("cached_keys", &self.keys.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

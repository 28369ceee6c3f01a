//! Lock-guarded chain handles for sharing one chain across tasks
//!
//! A chain's counter, cache and root key must change together. These
//! handles hold an async mutex for the whole `encrypt`/`decrypt` sequence,
//! so concurrent callers on the same chain are serialised while handles to
//! different chains never contend.

use std::sync::Arc;

use ratchetline_crypto::CryptoProvider;
use tokio::sync::Mutex;

use crate::{
    error::RatchetError, message::CipherMessage, ratchet::CipherKey, receiving::ReceivingChain,
    sending::SendingChain,
};

/// Cloneable handle to one [`SendingChain`].
///
/// Clones refer to the same chain.
pub struct SharedSendingChain<P: CryptoProvider> {
    inner: Arc<Mutex<SendingChain<P>>>,
}

impl<P: CryptoProvider> SharedSendingChain<P> {
    /// Take ownership of a chain.
    pub fn new(chain: SendingChain<P>) -> Self {
        Self { inner: Arc::new(Mutex::new(chain)) }
    }

    /// Encrypt under the chain lock. See [`SendingChain::encrypt`].
    pub async fn encrypt(&self, message: &[u8]) -> Result<CipherMessage<P::Key>, RatchetError> {
        let mut chain = self.inner.lock().await;
        chain.encrypt(message)
    }

    /// Counter the next message will be encrypted at.
    pub async fn counter(&self) -> u32 {
        self.inner.lock().await.counter()
    }
}

impl<P: CryptoProvider> Clone for SharedSendingChain<P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<P: CryptoProvider> From<SendingChain<P>> for SharedSendingChain<P> {
    fn from(chain: SendingChain<P>) -> Self {
        Self::new(chain)
    }
}

/// Cloneable handle to one [`ReceivingChain`].
///
/// Clones refer to the same chain and cache.
pub struct SharedReceivingChain<P: CryptoProvider> {
    inner: Arc<Mutex<ReceivingChain<P>>>,
}

impl<P: CryptoProvider> SharedReceivingChain<P> {
    /// Take ownership of a chain.
    pub fn new(chain: ReceivingChain<P>) -> Self {
        Self { inner: Arc::new(Mutex::new(chain)) }
    }

    /// Decrypt under the chain lock. See [`ReceivingChain::decrypt`].
    pub async fn decrypt(
        &self,
        message: &[u8],
        counter: u32,
    ) -> Result<CipherMessage<P::Key>, RatchetError> {
        let mut chain = self.inner.lock().await;
        chain.decrypt(message, counter)
    }

    /// Resolve a cipher key under the chain lock. See
    /// [`ReceivingChain::get_key`].
    pub async fn get_key(&self, counter: u32) -> Result<CipherKey, RatchetError> {
        let mut chain = self.inner.lock().await;
        chain.get_key(counter)
    }

    /// Number of steps the underlying ratchet has taken.
    pub async fn counter(&self) -> u32 {
        self.inner.lock().await.counter()
    }

    /// Number of cipher keys held in the cache.
    pub async fn cached_keys(&self) -> usize {
        self.inner.lock().await.cached_keys()
    }
}

impl<P: CryptoProvider> Clone for SharedReceivingChain<P> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<P: CryptoProvider> From<ReceivingChain<P>> for SharedReceivingChain<P> {
    fn from(chain: ReceivingChain<P>) -> Self {
        Self::new(chain)
    }
}

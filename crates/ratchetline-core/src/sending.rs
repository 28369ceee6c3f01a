//! Sending chain: one ratchet step per encrypted message

use ratchetline_crypto::CryptoProvider;

use crate::{
    error::RatchetError, message::CipherMessage, message_keys::derive_message_keys,
    ratchet::SymmetricRatchet,
};

/// Encrypt-only view of a symmetric ratchet.
///
/// # Invariants
///
/// - Every successful `encrypt` consumes exactly one step
/// - A failed `encrypt` consumes nothing
/// - Keys are never cached; a step cannot be replayed
pub struct SendingChain<P: CryptoProvider> {
    ratchet: SymmetricRatchet<P>,
}

impl<P: CryptoProvider> SendingChain<P> {
    /// Create a sending chain from an HMAC root key handle.
    pub fn new(provider: P, root_key: P::Key) -> Self {
        Self { ratchet: SymmetricRatchet::new(provider, root_key) }
    }

    /// Create a sending chain by importing raw root key bytes.
    pub fn from_secret(provider: P, secret: &[u8]) -> Result<Self, RatchetError> {
        Ok(Self { ratchet: SymmetricRatchet::from_secret(provider, secret)? })
    }

    /// Counter the next message will be encrypted at.
    pub fn counter(&self) -> u32 {
        self.ratchet.counter()
    }

    /// Encrypt `message` under the next chain step.
    ///
    /// The step is committed only after encryption succeeded.
    pub fn encrypt(&mut self, message: &[u8]) -> Result<CipherMessage<P::Key>, RatchetError> {
        let step = self.ratchet.derive_step()?;
        let provider = self.ratchet.provider();

        let keys = derive_message_keys(provider, &step.cipher_key)?;
        let cipher_text = provider.encrypt(&keys.aes_key, message, &keys.iv)?;

        let cipher_key = self.ratchet.commit(step);
        tracing::trace!(counter = cipher_key.counter(), len = message.len(), "message encrypted");

        Ok(CipherMessage {
            counter: cipher_key.counter(),
            payload: cipher_text,
            hmac_key: keys.hmac_key,
        })
    }
}

impl<P: CryptoProvider> std::fmt::Debug for SendingChain<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendingChain").field("counter", &self.counter()).finish_non_exhaustive()
    }
}

//! Output of chain encrypt and decrypt calls

use std::fmt;

/// Result of one chain operation.
///
/// For [`SendingChain::encrypt`](crate::SendingChain::encrypt) the payload
/// is the cipher-text; for
/// [`ReceivingChain::decrypt`](crate::ReceivingChain::decrypt) it is the
/// recovered plaintext. The HMAC key is handed to the external message
/// authentication step, which this crate does not perform.
#[derive(Clone)]
pub struct CipherMessage<K> {
    /// Chain counter the message key was derived at
    pub counter: u32,
    /// Cipher-text or plaintext, depending on direction
    pub payload: Vec<u8>,
    /// Per-message HMAC key
    pub hmac_key: K,
}

impl<K: fmt::Debug> fmt::Debug for CipherMessage<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherMessage")
            .field("counter", &self.counter)
            .field("payload_len", &self.payload.len())
            .field("hmac_key", &self.hmac_key)
            .finish()
    }
}

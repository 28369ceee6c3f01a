//! Expansion of a cipher key into per-message AES key, HMAC key and IV

use ratchetline_crypto::{CryptoError, CryptoProvider, IV_SIZE};

use crate::{error::RatchetError, ratchet::CipherKey};

/// HKDF info label for message key expansion
pub const MESSAGE_KEYS_INFO: &[u8] = b"InfoMessageKeys";

/// Number of HKDF blocks: AES key, HMAC key, IV source
const MESSAGE_KEY_BLOCKS: usize = 3;

/// Keys for encrypting or decrypting exactly one message.
pub struct MessageKeys<K> {
    /// AES-256 key (first HKDF block)
    pub aes_key: K,
    /// HMAC key for the external message authentication step (second block)
    pub hmac_key: K,
    /// First 16 bytes of the third block
    pub iv: [u8; IV_SIZE],
}

/// Expand a cipher key with HKDF (no salt, [`MESSAGE_KEYS_INFO`]).
///
/// Sending and receiving sides call this identically, so the same cipher
/// key always yields the same AES key, HMAC key and IV.
pub fn derive_message_keys<P: CryptoProvider>(
    provider: &P,
    cipher_key: &CipherKey,
) -> Result<MessageKeys<P::Key>, RatchetError> {
    let blocks = provider.hkdf(cipher_key.key(), MESSAGE_KEY_BLOCKS, None, MESSAGE_KEYS_INFO)?;

    let [aes_block, hmac_block, iv_block] = blocks.as_slice() else {
        return Err(RatchetError::MalformedExpansion {
            expected: MESSAGE_KEY_BLOCKS,
            actual: blocks.len(),
        });
    };

    let iv_source = iv_block.get(..IV_SIZE).ok_or(CryptoError::InvalidKeyLength {
        expected: IV_SIZE,
        actual: iv_block.len(),
    })?;
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(iv_source);

    Ok(MessageKeys {
        aes_key: provider.import_aes_key(aes_block)?,
        hmac_key: provider.import_hmac_key(hmac_block)?,
        iv,
    })
}

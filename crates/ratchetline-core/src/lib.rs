//! Ratchetline Message Ratchet
//!
//! The symmetric half of a Double-Ratchet-style protocol: a one-way chain
//! of HMAC derivations that yields one cipher key per message, wrapped in a
//! sending chain (encrypt, always forward) and a receiving chain (decrypt
//! in any order through a bounded skipped-key cache).
//!
//! # Key Lifecycle
//!
//! ```text
//! Root Key (from the DH ratchet step)
//!        │
//!        ▼ HMAC(root, 0x01)            HMAC(root, 0x02) → next root
//! Cipher Key[counter]
//!        │
//!        ▼ HKDF(cipher key, "InfoMessageKeys") → 3 blocks
//! AES key │ HMAC key │ IV (first 16 bytes of block 3)
//!        │
//!        ▼
//! AES-256-GCM Ciphertext
//! ```
//!
//! # Security
//!
//! Forward Secrecy:
//! - Each step replaces the root key; the previous one cannot be recovered
//! - The sending chain keeps no keys after `encrypt` returns
//!
//! Out-of-order Delivery:
//! - The receiving chain caches every intermediate cipher key up to the
//!   requested counter
//! - [`ChainConfig::max_skip`] bounds how far one request may advance, so a
//!   hostile counter cannot exhaust memory
//!
//! Authenticity:
//! - AES-GCM rejects any modified ciphertext, wrong key or wrong counter
//!   with `DecryptionFailed`, which is never retried
//!
//! Concurrency:
//! - Chains take `&mut self`; [`SharedSendingChain`] and
//!   [`SharedReceivingChain`] serialise callers that share one chain

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod message;
pub mod message_keys;
pub mod ratchet;
pub mod receiving;
pub mod sending;
pub mod shared;

#[cfg(test)]
mod testing;

pub use config::{ChainConfig, DEFAULT_MAX_SKIP};
pub use error::RatchetError;
pub use message::CipherMessage;
pub use message_keys::{MESSAGE_KEYS_INFO, MessageKeys, derive_message_keys};
pub use ratchet::{CIPHER_KEY_SIZE, CIPHER_KEY_TAG, CipherKey, ROOT_KEY_TAG, SymmetricRatchet};
pub use receiving::ReceivingChain;
pub use sending::SendingChain;
pub use shared::{SharedReceivingChain, SharedSendingChain};

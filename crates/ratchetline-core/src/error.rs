//! Error types for ratchet chain operations

use ratchetline_crypto::CryptoError;
use thiserror::Error;

/// Errors from the symmetric ratchet and its chains
#[derive(Debug, Error)]
pub enum RatchetError {
    /// Primitive provider failure, propagated unchanged
    ///
    /// Includes `DecryptionFailed` when a message was tampered with,
    /// encrypted under a different key, or requested at the wrong counter.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Requested counter is further ahead than the configured lookahead
    #[error(
        "skipped message limit exceeded: at counter {current}, requested {requested}, max skip {max_skip}"
    )]
    SkippedMessageLimitExceeded {
        /// Current ratchet counter
        current: u32,
        /// Requested counter
        requested: u32,
        /// Configured maximum lookahead
        max_skip: u32,
    },

    /// Ratchet counter would overflow
    #[error("ratchet counter overflow at {current}")]
    CounterOverflow {
        /// Counter when overflow was detected
        current: u32,
    },

    /// Key expansion returned the wrong number of blocks
    #[error("malformed key expansion: expected {expected} blocks, got {actual}")]
    MalformedExpansion {
        /// Blocks requested
        expected: usize,
        /// Blocks returned
        actual: usize,
    },
}

impl RatchetError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// A skipped-message rejection is not fatal: the session layer may
    /// resynchronise or drop the message and carry on.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Crypto(err) => err.is_fatal(),
            Self::CounterOverflow { .. } => true,
            Self::MalformedExpansion { .. } => true,

            Self::SkippedMessageLimitExceeded { .. } => false,
        }
    }

    /// True if authenticated decryption rejected the message.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::Crypto(CryptoError::DecryptionFailed { .. }))
    }
}

//! Error types for primitive provider and key identity operations

use thiserror::Error;

use crate::keys::{KeyAlgorithm, KeyType};

/// Errors from the primitive provider and public key identities
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key handle algorithm is neither key agreement nor signature
    /// verification
    #[error("unsupported key algorithm: {algorithm}")]
    UnsupportedAlgorithm {
        /// Algorithm of the rejected handle
        algorithm: KeyAlgorithm,
    },

    /// Key handle has the wrong type (e.g. private where public is required)
    #[error("invalid key type: expected {expected}, got {actual}")]
    InvalidKeyType {
        /// Required key type
        expected: KeyType,
        /// Type of the supplied handle
        actual: KeyType,
    },

    /// Key handle was passed to an operation of a different algorithm
    #[error("key mismatch: operation needs {expected} key, got {actual}")]
    KeyMismatch {
        /// Algorithm the operation requires
        expected: KeyAlgorithm,
        /// Algorithm of the supplied handle
        actual: KeyAlgorithm,
    },

    /// Invalid key material or buffer length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Coordinates or scalar do not describe a valid P-256 key
    #[error("invalid curve key: {reason}")]
    InvalidEcKey {
        /// Reason the key was rejected
        reason: String,
    },

    /// Authenticated decryption failed (tampering, wrong key or wrong
    /// counter)
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for decryption failure
        reason: String,
    },

    /// Encryption could not be performed
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        /// Reason for encryption failure
        reason: String,
    },

    /// HKDF could not produce the requested output
    #[error("key derivation failed: {reason}")]
    KeyDerivationFailed {
        /// Reason for derivation failure
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Fatal errors mean the input is corrupt, malicious or the caller has
    /// a bug. Retrying with the same inputs cannot succeed.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::DecryptionFailed { .. } => true,
            Self::UnsupportedAlgorithm { .. } => true,
            Self::InvalidKeyType { .. } => true,
            Self::KeyMismatch { .. } => true,
            Self::InvalidKeyLength { .. } => true,
            Self::InvalidEcKey { .. } => true,

            // Backend failures, may succeed on a different provider
            Self::EncryptionFailed { .. } => false,
            Self::KeyDerivationFailed { .. } => false,
        }
    }
}

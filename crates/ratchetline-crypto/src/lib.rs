//! Ratchetline Cryptographic Primitives
//!
//! The primitive provider boundary and the EC public key identity that the
//! Ratchetline message ratchet is built on.
//!
//! # Provider Boundary
//!
//! The ratchet consumes HMAC, HKDF, AES, digests and EC key import/export
//! as opaque, already-correct operations through [`CryptoProvider`]. Keys
//! cross that boundary only as handles ([`KeyHandle`]), tagged with the
//! algorithm and usages they were imported for.
//!
//! ```text
//! raw bytes ──import──▶ CryptoKey (HMAC | AES-GCM | ECDH | ECDSA)
//!                          │
//!                          ▼
//!            sign / hkdf / encrypt / decrypt / digest
//! ```
//!
//! [`RustCryptoProvider`] implements the boundary with HMAC-SHA-256,
//! HKDF-SHA-256, AES-256-GCM, SHA-1/SHA-256 and NIST P-256.
//!
//! # Public Key Identity
//!
//! [`EcPublicKey`] gives a P-256 public key a canonical 64-byte
//! serialization (`x || y`) and a SHA-1 thumbprint. Equality uses the full
//! serialization; the thumbprint is a label only.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ec_public_key;
pub mod error;
pub mod keys;
pub mod provider;

pub use ec_public_key::{EcPublicKey, SERIALIZED_SIZE, THUMBPRINT_ALGORITHM};
pub use error::CryptoError;
pub use keys::{CryptoKey, KeyAlgorithm, KeyHandle, KeyKind, KeyType, KeyUsage};
pub use provider::{
    AES_KEY_SIZE, COORDINATE_SIZE, CryptoProvider, DigestAlgorithm, HASH_SIZE, IV_SIZE,
    RustCryptoProvider,
};
pub use zeroize::Zeroizing;

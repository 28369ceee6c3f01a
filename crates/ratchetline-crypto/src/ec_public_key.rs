//! EC public key identity
//!
//! Wraps a P-256 public key handle with its canonical serialization
//! (`x || y`, fixed width) and a thumbprint (hex SHA-1 of that
//! serialization). The DH ratchet compares identities to detect a peer
//! rotating its ratchet key; logs use the thumbprint.
//!
//! # Security
//!
//! - Equality is defined on the full 64-byte serialization, never on the
//!   thumbprint or the native handle
//! - The thumbprint is a label for logs and lookups, not a security
//!   boundary

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    error::CryptoError,
    keys::{KeyHandle, KeyKind, KeyType},
    provider::{COORDINATE_SIZE, CryptoProvider, DigestAlgorithm},
};

/// Length of the canonical serialization (`x || y`, 64 bytes)
pub const SERIALIZED_SIZE: usize = 2 * COORDINATE_SIZE;

/// Digest used for thumbprints
pub const THUMBPRINT_ALGORITHM: DigestAlgorithm = DigestAlgorithm::Sha1;

/// Canonical, comparison-safe wrapper around an EC public key.
///
/// Immutable after construction.
#[derive(Clone)]
pub struct EcPublicKey<K> {
    key: K,
    kind: KeyKind,
    serialized: Vec<u8>,
    thumbprint: String,
}

impl<K: KeyHandle + Clone> EcPublicKey<K> {
    /// Wrap a provider-native public key handle.
    ///
    /// # Errors
    ///
    /// - `UnsupportedAlgorithm` if the handle is neither an ECDH nor an
    ///   ECDSA key
    /// - `InvalidKeyType` if the handle is not a public key
    pub fn create<P>(provider: &P, key: K) -> Result<Self, CryptoError>
    where
        P: CryptoProvider<Key = K>,
    {
        let algorithm = key.algorithm();
        let Some(kind) = algorithm.key_kind() else {
            tracing::debug!(%algorithm, "rejected public key handle with unsupported algorithm");
            return Err(CryptoError::UnsupportedAlgorithm { algorithm });
        };

        let key_type = key.key_type();
        if key_type != KeyType::Public {
            tracing::debug!(%key_type, "rejected non-public key handle");
            return Err(CryptoError::InvalidKeyType { expected: KeyType::Public, actual: key_type });
        }

        let (x, y) = provider.export_key_coordinates(&key)?;
        let mut serialized = Vec::with_capacity(SERIALIZED_SIZE);
        for coordinate in [&x, &y] {
            if coordinate.len() != COORDINATE_SIZE {
                return Err(CryptoError::InvalidKeyLength {
                    expected: COORDINATE_SIZE,
                    actual: coordinate.len(),
                });
            }
            serialized.extend_from_slice(coordinate);
        }

        let thumbprint = hex::encode(provider.digest(THUMBPRINT_ALGORITHM, &serialized)?);

        Ok(Self { key, kind, serialized, thumbprint })
    }

    /// Rebuild an identity from its canonical serialization.
    ///
    /// `raw` must be exactly [`SERIALIZED_SIZE`] bytes: x-coordinate then
    /// y-coordinate. `kind` decides the usages of the rebuilt handle.
    pub fn import_key<P>(provider: &P, raw: &[u8], kind: KeyKind) -> Result<Self, CryptoError>
    where
        P: CryptoProvider<Key = K>,
    {
        if raw.len() != SERIALIZED_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: SERIALIZED_SIZE,
                actual: raw.len(),
            });
        }

        let (x, y) = raw.split_at(COORDINATE_SIZE);
        let key = provider.import_public_key(x, y, kind)?;
        Self::create(provider, key)
    }
}

impl<K> EcPublicKey<K> {
    /// Canonical `x || y` serialization.
    pub fn serialize(&self) -> &[u8] {
        &self.serialized
    }

    /// Hex-encoded SHA-1 of the serialization.
    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    /// Provider-native handle this identity wraps.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Agreement or signing key.
    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// True iff both serializations are byte-identical.
    ///
    /// The key kind does not take part: the same point imported for
    /// agreement and for signing is the same public key.
    pub fn is_equal<L>(&self, other: &EcPublicKey<L>) -> bool {
        self.serialized == other.serialized
    }
}

impl<K> PartialEq for EcPublicKey<K> {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl<K> Eq for EcPublicKey<K> {}

impl<K> Hash for EcPublicKey<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialized.hash(state);
    }
}

impl<K> fmt::Display for EcPublicKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.thumbprint)
    }
}

impl<K> fmt::Debug for EcPublicKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPublicKey")
            .field("kind", &self.kind)
            .field("thumbprint", &self.thumbprint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{CryptoKey, KeyAlgorithm, RustCryptoProvider};

    fn public_key(scalar: u8, kind: KeyKind) -> CryptoKey {
        let provider = RustCryptoProvider::new();
        let private = provider.import_private_key(&[scalar; 32], kind).unwrap();
        provider.public_key(&private).unwrap()
    }

    fn identity(scalar: u8) -> EcPublicKey<CryptoKey> {
        EcPublicKey::create(&RustCryptoProvider::new(), public_key(scalar, KeyKind::Agreement))
            .unwrap()
    }

    #[test]
    fn create_produces_fixed_width_serialization() {
        let id = identity(1);

        assert_eq!(id.serialize().len(), SERIALIZED_SIZE);
        assert_eq!(id.kind(), KeyKind::Agreement);
        assert_eq!(id.key().algorithm(), KeyAlgorithm::Ecdh);
    }

    #[test]
    fn thumbprint_is_hex_sha1_of_serialization() {
        let provider = RustCryptoProvider::new();
        let id = identity(2);

        let expected =
            hex::encode(provider.digest(DigestAlgorithm::Sha1, id.serialize()).unwrap());

        assert_eq!(id.thumbprint(), expected);
        assert_eq!(id.thumbprint().len(), 40);
        assert_eq!(id.to_string(), expected);
    }

    #[test]
    fn import_of_serialization_is_equal() {
        let provider = RustCryptoProvider::new();
        let original = identity(3);

        let imported =
            EcPublicKey::import_key(&provider, original.serialize(), KeyKind::Agreement).unwrap();

        assert!(imported.is_equal(&original));
        assert_eq!(imported, original);
        assert_eq!(imported.thumbprint(), original.thumbprint());
    }

    #[test]
    fn different_keys_are_not_equal() {
        let a = identity(4);
        let b = identity(5);

        assert!(!a.is_equal(&b));
        assert_ne!(a.thumbprint(), b.thumbprint());
    }

    #[test]
    fn equality_ignores_kind() {
        let provider = RustCryptoProvider::new();
        let agreement = identity(6);
        let signing =
            EcPublicKey::import_key(&provider, agreement.serialize(), KeyKind::Signing).unwrap();

        assert_eq!(signing.kind(), KeyKind::Signing);
        assert_eq!(signing.key().algorithm(), KeyAlgorithm::Ecdsa);
        assert!(signing.is_equal(&agreement));
    }

    #[test]
    fn hash_follows_serialization() {
        let provider = RustCryptoProvider::new();
        let original = identity(7);
        let copy =
            EcPublicKey::import_key(&provider, original.serialize(), KeyKind::Agreement).unwrap();

        let mut set = HashSet::new();
        set.insert(original);
        assert!(!set.insert(copy));
        assert!(set.insert(identity(8)));
    }

    #[test]
    fn create_rejects_private_key() {
        let provider = RustCryptoProvider::new();
        let private = provider.import_private_key(&[9; 32], KeyKind::Signing).unwrap();

        let result = EcPublicKey::create(&provider, private);

        assert!(matches!(
            result,
            Err(CryptoError::InvalidKeyType { expected: KeyType::Public, actual: KeyType::Private })
        ));
    }

    #[test]
    fn create_rejects_symmetric_key() {
        let provider = RustCryptoProvider::new();
        let hmac = provider.import_hmac_key(&[1; 32]).unwrap();

        let result = EcPublicKey::create(&provider, hmac);

        assert!(matches!(
            result,
            Err(CryptoError::UnsupportedAlgorithm { algorithm: KeyAlgorithm::Hmac })
        ));
    }

    #[test]
    fn import_rejects_wrong_length() {
        let provider = RustCryptoProvider::new();
        let original = identity(10);

        let result = EcPublicKey::<CryptoKey>::import_key(
            &provider,
            &original.serialize()[..63],
            KeyKind::Agreement,
        );

        assert!(matches!(result, Err(CryptoError::InvalidKeyLength { expected: 64, actual: 63 })));
    }

    #[test]
    fn debug_shows_thumbprint_only() {
        let id = identity(11);
        let rendered = format!("{id:?}");

        assert!(rendered.contains(id.thumbprint()));
        assert!(!rendered.contains("serialized"));
    }
}

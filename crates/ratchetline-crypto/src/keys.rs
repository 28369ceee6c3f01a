//! Opaque key handles
//!
//! The ratchet never touches raw key bytes directly. Every key it holds is a
//! handle tagged with the algorithm it was imported for, whether it is
//! secret, public or private, and the usages granted at import time. Only
//! the provider that created a handle can reach its material, and only at
//! explicit export boundaries.

use std::fmt;

use zeroize::Zeroizing;

/// Algorithm a key handle was imported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// HMAC-SHA-256 signing key (ratchet root keys, message HMAC keys)
    Hmac,
    /// AES-256-GCM encryption key
    AesGcm,
    /// P-256 key agreement key
    Ecdh,
    /// P-256 signature key
    Ecdsa,
}

impl KeyAlgorithm {
    /// Elliptic-curve kind for EC algorithms, `None` for symmetric ones.
    pub fn key_kind(self) -> Option<KeyKind> {
        match self {
            Self::Ecdh => Some(KeyKind::Agreement),
            Self::Ecdsa => Some(KeyKind::Signing),
            Self::Hmac | Self::AesGcm => None,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hmac => "HMAC",
            Self::AesGcm => "AES-GCM",
            Self::Ecdh => "ECDH",
            Self::Ecdsa => "ECDSA",
        };
        f.write_str(name)
    }
}

/// Visibility class of a key handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Symmetric key
    Secret,
    /// Public half of an asymmetric key pair
    Public,
    /// Private half of an asymmetric key pair
    Private,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Secret => "secret",
            Self::Public => "public",
            Self::Private => "private",
        };
        f.write_str(name)
    }
}

/// Which elliptic-curve role a key plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Diffie-Hellman key agreement (ratchet keys, pre-keys)
    Agreement,
    /// Signature creation and verification (identity keys)
    Signing,
}

impl KeyKind {
    /// Handle algorithm for this kind.
    pub fn algorithm(self) -> KeyAlgorithm {
        match self {
            Self::Agreement => KeyAlgorithm::Ecdh,
            Self::Signing => KeyAlgorithm::Ecdsa,
        }
    }

    /// Usages granted to a handle of this kind and type.
    pub fn usages(self, key_type: KeyType) -> &'static [KeyUsage] {
        match (self, key_type) {
            (Self::Signing, KeyType::Public) => &[KeyUsage::Verify],
            (Self::Signing, _) => &[KeyUsage::Sign],
            (Self::Agreement, KeyType::Public) => &[],
            (Self::Agreement, _) => &[KeyUsage::DeriveBits],
        }
    }
}

/// Operation a key handle may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    /// Produce a MAC or signature
    Sign,
    /// Verify a signature
    Verify,
    /// Encrypt data
    Encrypt,
    /// Decrypt data
    Decrypt,
    /// Derive shared secret bits
    DeriveBits,
}

/// Common view over provider-native key handles.
pub trait KeyHandle {
    /// Algorithm the handle was imported for.
    fn algorithm(&self) -> KeyAlgorithm;

    /// Secret, public or private.
    fn key_type(&self) -> KeyType;

    /// Usages granted at import time.
    fn usages(&self) -> &[KeyUsage];
}

/// Key handle issued by [`RustCryptoProvider`](crate::RustCryptoProvider).
///
/// Material is only reachable from inside this crate. Secret material is
/// zeroized on drop; `Debug` never prints it.
#[derive(Clone)]
pub struct CryptoKey {
    algorithm: KeyAlgorithm,
    key_type: KeyType,
    usages: &'static [KeyUsage],
    material: KeyMaterial,
}

#[derive(Clone)]
pub(crate) enum KeyMaterial {
    Secret(Zeroizing<Vec<u8>>),
    EcPublic(p256::PublicKey),
    EcPrivate(p256::SecretKey),
}

impl CryptoKey {
    pub(crate) fn hmac(raw: &[u8]) -> Self {
        Self {
            algorithm: KeyAlgorithm::Hmac,
            key_type: KeyType::Secret,
            usages: &[KeyUsage::Sign, KeyUsage::Verify],
            material: KeyMaterial::Secret(Zeroizing::new(raw.to_vec())),
        }
    }

    pub(crate) fn aes(raw: &[u8]) -> Self {
        Self {
            algorithm: KeyAlgorithm::AesGcm,
            key_type: KeyType::Secret,
            usages: &[KeyUsage::Encrypt, KeyUsage::Decrypt],
            material: KeyMaterial::Secret(Zeroizing::new(raw.to_vec())),
        }
    }

    pub(crate) fn ec_public(key: p256::PublicKey, kind: KeyKind) -> Self {
        Self {
            algorithm: kind.algorithm(),
            key_type: KeyType::Public,
            usages: kind.usages(KeyType::Public),
            material: KeyMaterial::EcPublic(key),
        }
    }

    pub(crate) fn ec_private(key: p256::SecretKey, kind: KeyKind) -> Self {
        Self {
            algorithm: kind.algorithm(),
            key_type: KeyType::Private,
            usages: kind.usages(KeyType::Private),
            material: KeyMaterial::EcPrivate(key),
        }
    }

    pub(crate) fn material(&self) -> &KeyMaterial {
        &self.material
    }
}

impl KeyHandle for CryptoKey {
    fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    fn key_type(&self) -> KeyType {
        self.key_type
    }

    fn usages(&self) -> &[KeyUsage] {
        self.usages
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("algorithm", &self.algorithm)
            .field("key_type", &self.key_type)
            .field("usages", &self.usages)
            .finish_non_exhaustive()
    }
}

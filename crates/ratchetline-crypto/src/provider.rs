//! Primitive provider boundary
//!
//! Everything the ratchet needs from a cryptographic backend goes through
//! [`CryptoProvider`]. Each call is a fallible, potentially blocking
//! operation on opaque key handles. [`RustCryptoProvider`] is the default
//! backend built on the `RustCrypto` crates.

use aes_gcm::{
    AesGcm, Nonce,
    aead::{Aead, KeyInit, consts::U16},
    aes::Aes256,
};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use p256::{
    EncodedPoint, FieldBytes,
    elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint},
};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::{
    error::CryptoError,
    keys::{CryptoKey, KeyAlgorithm, KeyHandle, KeyKind, KeyMaterial, KeyType},
};

type HmacSha256 = Hmac<Sha256>;

/// AES-256-GCM with a 16-byte nonce
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Output size of HMAC-SHA-256 and of each HKDF block (32 bytes)
pub const HASH_SIZE: usize = 32;

/// AES-256 key size (32 bytes)
pub const AES_KEY_SIZE: usize = 32;

/// AES initialization vector size (16 bytes)
pub const IV_SIZE: usize = 16;

/// Width of one P-256 affine coordinate (32 bytes)
pub const COORDINATE_SIZE: usize = 32;

/// Maximum number of HKDF-SHA-256 output blocks (RFC 5869)
const MAX_HKDF_BLOCKS: usize = 255;

/// Content digest algorithms offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-1 (160-bit), used for public key thumbprints
    Sha1,
    /// SHA-256
    Sha256,
}

/// Atomic cryptographic operations consumed by the ratchet.
///
/// Implementations are assumed correct; callers never retry a failed call.
///
/// # Invariants
///
/// - `sign` and `hkdf` are deterministic for identical inputs
/// - `decrypt` fails with [`CryptoError::DecryptionFailed`] whenever the
///   ciphertext, key or IV differ from what `encrypt` used
/// - Key material never leaves a handle except through
///   `export_key_coordinates` (public keys only)
pub trait CryptoProvider {
    /// Provider-native key handle.
    type Key: KeyHandle + Clone;

    /// HMAC-SHA-256 over `data` with an HMAC key handle.
    fn sign(&self, key: &Self::Key, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    /// Import raw bytes as an HMAC-SHA-256 key.
    fn import_hmac_key(&self, raw: &[u8]) -> Result<Self::Key, CryptoError>;

    /// Import raw bytes as an AES-256 key.
    fn import_aes_key(&self, raw: &[u8]) -> Result<Self::Key, CryptoError>;

    /// HKDF-SHA-256 producing `output_count` blocks of [`HASH_SIZE`] bytes.
    ///
    /// `salt = None` uses the all-zero salt of RFC 5869.
    fn hkdf(
        &self,
        ikm: &[u8],
        output_count: usize,
        salt: Option<&[u8]>,
        info: &[u8],
    ) -> Result<Vec<Zeroizing<Vec<u8>>>, CryptoError>;

    /// Authenticated encryption of `plaintext` under `key` and `iv`.
    fn encrypt(&self, key: &Self::Key, plaintext: &[u8], iv: &[u8])
    -> Result<Vec<u8>, CryptoError>;

    /// Authenticated decryption. Fails on any tampering.
    fn decrypt(
        &self,
        key: &Self::Key,
        ciphertext: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Content digest of `data`.
    fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Affine `(x, y)` coordinates of an EC public key, each
    /// [`COORDINATE_SIZE`] bytes.
    fn export_key_coordinates(&self, key: &Self::Key) -> Result<(Vec<u8>, Vec<u8>), CryptoError>;

    /// Rebuild an EC public key handle from affine coordinates.
    fn import_public_key(&self, x: &[u8], y: &[u8], kind: KeyKind)
    -> Result<Self::Key, CryptoError>;

    /// Import a big-endian private scalar as an EC private key handle.
    fn import_private_key(&self, scalar: &[u8], kind: KeyKind) -> Result<Self::Key, CryptoError>;

    /// Public half of an EC private key handle.
    fn public_key(&self, private: &Self::Key) -> Result<Self::Key, CryptoError>;
}

/// Default provider: HMAC/HKDF-SHA-256, AES-256-GCM, SHA-1/SHA-256 and
/// NIST P-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    /// Create a provider.
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for RustCryptoProvider {
    type Key = CryptoKey;

    fn sign(&self, key: &CryptoKey, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let raw = secret_material(key, KeyAlgorithm::Hmac)?;
        let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(raw) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        mac.update(data);
        Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
    }

    fn import_hmac_key(&self, raw: &[u8]) -> Result<CryptoKey, CryptoError> {
        Ok(CryptoKey::hmac(raw))
    }

    fn import_aes_key(&self, raw: &[u8]) -> Result<CryptoKey, CryptoError> {
        if raw.len() != AES_KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength { expected: AES_KEY_SIZE, actual: raw.len() });
        }
        Ok(CryptoKey::aes(raw))
    }

    fn hkdf(
        &self,
        ikm: &[u8],
        output_count: usize,
        salt: Option<&[u8]>,
        info: &[u8],
    ) -> Result<Vec<Zeroizing<Vec<u8>>>, CryptoError> {
        if output_count == 0 || output_count > MAX_HKDF_BLOCKS {
            return Err(CryptoError::KeyDerivationFailed {
                reason: format!("output count {output_count} outside 1..={MAX_HKDF_BLOCKS}"),
            });
        }

        let hkdf = Hkdf::<Sha256>::new(salt, ikm);
        let mut okm = Zeroizing::new(vec![0u8; output_count * HASH_SIZE]);
        hkdf.expand(info, okm.as_mut_slice()).map_err(|_| CryptoError::KeyDerivationFailed {
            reason: "HKDF expand rejected output length".to_string(),
        })?;

        Ok(okm.chunks(HASH_SIZE).map(|block| Zeroizing::new(block.to_vec())).collect())
    }

    fn encrypt(&self, key: &CryptoKey, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let cipher = aes_cipher(key)?;
        let nonce = nonce_from_iv(iv)?;

        cipher.encrypt(&nonce, plaintext).map_err(|_| CryptoError::EncryptionFailed {
            reason: "AES-GCM rejected plaintext".to_string(),
        })
    }

    fn decrypt(
        &self,
        key: &CryptoKey,
        ciphertext: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let cipher = aes_cipher(key)?;
        let nonce = nonce_from_iv(iv)?;

        cipher.decrypt(&nonce, ciphertext).map_err(|_| CryptoError::DecryptionFailed {
            reason: "authentication failed".to_string(),
        })
    }

    fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = match algorithm {
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        };
        Ok(digest)
    }

    fn export_key_coordinates(&self, key: &CryptoKey) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        let KeyMaterial::EcPublic(public) = key.material() else {
            return Err(CryptoError::InvalidKeyType {
                expected: KeyType::Public,
                actual: key.key_type(),
            });
        };

        let point = public.to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            return Err(CryptoError::InvalidEcKey {
                reason: "point has no affine coordinates".to_string(),
            });
        };

        Ok((x.to_vec(), y.to_vec()))
    }

    fn import_public_key(
        &self,
        x: &[u8],
        y: &[u8],
        kind: KeyKind,
    ) -> Result<CryptoKey, CryptoError> {
        let point = EncodedPoint::from_affine_coordinates(
            &field_bytes(x)?,
            &field_bytes(y)?,
            false,
        );
        let public: Option<p256::PublicKey> = p256::PublicKey::from_encoded_point(&point).into();
        let public = public.ok_or_else(|| CryptoError::InvalidEcKey {
            reason: "coordinates are not a point on P-256".to_string(),
        })?;

        Ok(CryptoKey::ec_public(public, kind))
    }

    fn import_private_key(&self, scalar: &[u8], kind: KeyKind) -> Result<CryptoKey, CryptoError> {
        if scalar.len() != COORDINATE_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: COORDINATE_SIZE,
                actual: scalar.len(),
            });
        }

        let secret = p256::SecretKey::from_slice(scalar).map_err(|_| CryptoError::InvalidEcKey {
            reason: "scalar is zero or not below the group order".to_string(),
        })?;

        Ok(CryptoKey::ec_private(secret, kind))
    }

    fn public_key(&self, private: &CryptoKey) -> Result<CryptoKey, CryptoError> {
        let KeyMaterial::EcPrivate(secret) = private.material() else {
            return Err(CryptoError::InvalidKeyType {
                expected: KeyType::Private,
                actual: private.key_type(),
            });
        };
        let kind = private
            .algorithm()
            .key_kind()
            .ok_or(CryptoError::UnsupportedAlgorithm { algorithm: private.algorithm() })?;

        Ok(CryptoKey::ec_public(secret.public_key(), kind))
    }
}

/// Raw bytes of a symmetric handle imported for `expected`.
fn secret_material(key: &CryptoKey, expected: KeyAlgorithm) -> Result<&[u8], CryptoError> {
    if key.algorithm() != expected {
        return Err(CryptoError::KeyMismatch { expected, actual: key.algorithm() });
    }
    match key.material() {
        KeyMaterial::Secret(raw) => Ok(raw.as_slice()),
        KeyMaterial::EcPublic(_) | KeyMaterial::EcPrivate(_) => {
            Err(CryptoError::InvalidKeyType { expected: KeyType::Secret, actual: key.key_type() })
        },
    }
}

fn aes_cipher(key: &CryptoKey) -> Result<Aes256Gcm16, CryptoError> {
    let raw = secret_material(key, KeyAlgorithm::AesGcm)?;
    Aes256Gcm16::new_from_slice(raw)
        .map_err(|_| CryptoError::InvalidKeyLength { expected: AES_KEY_SIZE, actual: raw.len() })
}

fn nonce_from_iv(iv: &[u8]) -> Result<Nonce<U16>, CryptoError> {
    let iv = <[u8; IV_SIZE]>::try_from(iv)
        .map_err(|_| CryptoError::InvalidKeyLength { expected: IV_SIZE, actual: iv.len() })?;
    Ok(Nonce::<U16>::from(iv))
}

/// One affine coordinate, which must be exactly [`COORDINATE_SIZE`] bytes.
fn field_bytes(coordinate: &[u8]) -> Result<FieldBytes, CryptoError> {
    let bytes = <[u8; COORDINATE_SIZE]>::try_from(coordinate).map_err(|_| {
        CryptoError::InvalidKeyLength { expected: COORDINATE_SIZE, actual: coordinate.len() }
    })?;
    Ok(FieldBytes::from(bytes))
}

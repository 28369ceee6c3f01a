//! Fault-injecting provider for state-atomicity tests

use std::{cell::Cell, rc::Rc};

use ratchetline_crypto::{
    CryptoError, CryptoKey, CryptoProvider, DigestAlgorithm, KeyKind, RustCryptoProvider,
    Zeroizing,
};

/// Provider operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    ImportHmacKey,
    Encrypt,
    /// Not an error: `hkdf` returns one block fewer than requested
    ShortHkdf,
}

/// Delegates to [`RustCryptoProvider`] unless told to fail an operation.
///
/// Clones share the failure switch.
#[derive(Clone, Default)]
pub(crate) struct FlakyProvider {
    inner: RustCryptoProvider,
    failing: Rc<Cell<Option<Operation>>>,
}

impl FlakyProvider {
    pub(crate) fn fail_on(&self, operation: Option<Operation>) {
        self.failing.set(operation);
    }

    fn check(&self, operation: Operation) -> Result<(), CryptoError> {
        if self.failing.get() == Some(operation) {
            return Err(CryptoError::EncryptionFailed {
                reason: format!("injected {operation:?} failure"),
            });
        }
        Ok(())
    }
}

impl CryptoProvider for FlakyProvider {
    type Key = CryptoKey;

    fn sign(&self, key: &CryptoKey, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        self.inner.sign(key, data)
    }

    fn import_hmac_key(&self, raw: &[u8]) -> Result<CryptoKey, CryptoError> {
        self.check(Operation::ImportHmacKey)?;
        self.inner.import_hmac_key(raw)
    }

    fn import_aes_key(&self, raw: &[u8]) -> Result<CryptoKey, CryptoError> {
        self.inner.import_aes_key(raw)
    }

    fn hkdf(
        &self,
        ikm: &[u8],
        output_count: usize,
        salt: Option<&[u8]>,
        info: &[u8],
    ) -> Result<Vec<Zeroizing<Vec<u8>>>, CryptoError> {
        let mut blocks = self.inner.hkdf(ikm, output_count, salt, info)?;
        if self.failing.get() == Some(Operation::ShortHkdf) {
            blocks.pop();
        }
        Ok(blocks)
    }

    fn encrypt(&self, key: &CryptoKey, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.check(Operation::Encrypt)?;
        self.inner.encrypt(key, plaintext, iv)
    }

    fn decrypt(
        &self,
        key: &CryptoKey,
        ciphertext: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.inner.decrypt(key, ciphertext, iv)
    }

    fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.inner.digest(algorithm, data)
    }

    fn export_key_coordinates(&self, key: &CryptoKey) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
        self.inner.export_key_coordinates(key)
    }

    fn import_public_key(
        &self,
        x: &[u8],
        y: &[u8],
        kind: KeyKind,
    ) -> Result<CryptoKey, CryptoError> {
        self.inner.import_public_key(x, y, kind)
    }

    fn import_private_key(&self, scalar: &[u8], kind: KeyKind) -> Result<CryptoKey, CryptoError> {
        self.inner.import_private_key(scalar, kind)
    }

    fn public_key(&self, private: &CryptoKey) -> Result<CryptoKey, CryptoError> {
        self.inner.public_key(private)
    }
}

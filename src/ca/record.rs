//! The in-memory description of a generated interception CA.

use std::fmt;
use std::path::{Path, PathBuf};

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::utils;

/// PEM-encoded private key that is redacted in `Debug` and zeroed on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyPem(String);

impl PrivateKeyPem {
    pub fn new(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    /// Access the key material. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PrivateKeyPem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKeyPem([REDACTED])")
    }
}

/// A generated CA: where its certificate lives and the certificate itself.
///
/// `cert_pem` is the authoritative copy. As long as it is non-empty the file
/// at `cert_file_path` can be rewritten without generating new key material.
/// The private key, when present, only ever lives in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaRecord {
    cert_file_path: PathBuf,
    cert_pem: Vec<u8>,
    key_pem: PrivateKeyPem,
}

impl CaRecord {
    pub fn new(cert_file_path: impl Into<PathBuf>, cert_pem: impl Into<Vec<u8>>) -> Self {
        Self {
            cert_file_path: cert_file_path.into(),
            cert_pem: cert_pem.into(),
            key_pem: PrivateKeyPem::default(),
        }
    }

    /// Attach the CA private key used to sign interception leaf certificates.
    pub fn with_private_key(mut self, key_pem: impl Into<String>) -> Self {
        self.key_pem = PrivateKeyPem::new(key_pem);
        self
    }

    pub fn cert_file_path(&self) -> &Path {
        &self.cert_file_path
    }

    pub fn cert_pem(&self) -> &[u8] {
        &self.cert_pem
    }

    /// Certificate PEM as text, `None` if it is not valid UTF-8.
    pub fn cert_pem_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.cert_pem).ok()
    }

    /// Private key, `None` for records produced without one.
    pub fn private_key(&self) -> Option<&PrivateKeyPem> {
        (!self.key_pem.is_empty()).then_some(&self.key_pem)
    }

    /// Whether the certificate file can be rewritten from memory.
    pub fn is_restorable(&self) -> bool {
        !self.cert_pem.is_empty() && !self.cert_file_path.as_os_str().is_empty()
    }

    /// Whether the certificate file is definitely gone from disk.
    pub fn is_missing_on_disk(&self) -> bool {
        !utils::path_exists(&self.cert_file_path)
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced while creating or restoring the interception CA.
#[derive(Debug, Error)]
pub enum CaError {
    /// Key or certificate generation failed inside rcgen.
    #[error("Failed to generate CA material: {0}")]
    Generation(#[from] rcgen::Error),

    /// The directory that should hold the certificate could not be created.
    #[error("Failed to create certificate directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A freshly generated certificate could not be written.
    #[error("Failed to write CA certificate to {path}: {source}")]
    WriteCertificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cached PEM could not be written back after the file disappeared.
    #[error("Failed to restore CA certificate at {path}: {source}")]
    RestoreCertificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generation settings could not be read from configuration.
    #[error("Invalid CA configuration: {0}")]
    Config(String),

    /// Failure reported by a non-rcgen generator.
    #[error("CA generator failed: {0}")]
    Generator(String),
}

impl CaError {
    /// Create a generator error from any message
    pub fn generator<S: Into<String>>(message: S) -> Self {
        Self::Generator(message.into())
    }
}

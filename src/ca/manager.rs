//! Lifecycle of the process-wide interception CA.
//!
//! One [`CaLifecycleManager`] is created per process and shared by reference.
//! Every operation takes the same lock for its whole check-and-act sequence,
//! so concurrent callers never both decide to restore or regenerate.

use std::fs;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::ca::{CaGenerator, CaRecord, RcgenCaGenerator};
use crate::config::Configuration;
use crate::errors::CaError;
use crate::observability::metrics::{MetricsRecorder, RESOURCE_CERTIFICATE};
use crate::utils;

/// Observable state of the CA cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaState {
    /// No CA has been created, or it was cleaned up.
    Absent,
    /// A CA exists and its certificate file is present.
    OnDisk,
    /// A CA exists but its certificate file was removed behind our back.
    MemoryOnly,
}

impl std::fmt::Display for CaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaState::Absent => write!(f, "absent"),
            CaState::OnDisk => write!(f, "on_disk"),
            CaState::MemoryOnly => write!(f, "memory_only"),
        }
    }
}

pub struct CaLifecycleManager {
    generator: Arc<dyn CaGenerator>,
    version: String,
    metrics: MetricsRecorder,
    cell: Mutex<Option<CaRecord>>,
}

impl CaLifecycleManager {
    pub fn new(generator: Arc<dyn CaGenerator>, version: impl Into<String>) -> Self {
        Self {
            generator,
            version: version.into(),
            metrics: MetricsRecorder::new(),
            cell: Mutex::new(None),
        }
    }

    /// Manager backed by [`RcgenCaGenerator`].
    pub fn with_rcgen(version: impl Into<String>) -> Self {
        Self::new(Arc::new(RcgenCaGenerator::default()), version)
    }

    /// Version string handed to the generator.
    pub fn version(&self) -> &str {
        &self.version
    }

    // Writes to disk always happen before the cell is updated, so a poisoned
    // lock still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, Option<CaRecord>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the current CA, creating it or restoring its file as needed.
    ///
    /// A missing file is rewritten from the cached PEM when there is one and
    /// regenerated otherwise. On error the cell keeps its previous value.
    ///
    /// # Errors
    ///
    /// Generator failures are returned as they come. A failed restore write
    /// is returned as [`CaError::RestoreCertificate`] rather than handing out
    /// a path with no file behind it; the record stays cached, so the next
    /// call retries the write without generating a new CA.
    pub fn get_or_create(&self, config: &Configuration) -> Result<CaRecord, CaError> {
        let mut cell = self.lock();

        if let Some(record) = cell.as_ref() {
            if !record.is_missing_on_disk() {
                return Ok(record.clone());
            }

            if record.is_restorable() {
                let path = record.cert_file_path();
                info!(path = %path.display(), "Restoring temporary certificate file");
                utils::write_to_file(path, record.cert_pem()).map_err(|source| {
                    CaError::RestoreCertificate { path: path.to_path_buf(), source }
                })?;
                self.metrics.record_ca_restored();
                return Ok(record.clone());
            }

            warn!(
                path = %record.cert_file_path().display(),
                "Certificate Authority file is gone and no cached copy exists"
            );
        }

        info!(version = %self.version, "Creating new Certificate Authority");
        let record = match self.generator.init_ca(config, &self.version) {
            Ok(record) => record,
            Err(e) => {
                self.metrics.record_ca_generation_failed();
                warn!(error = %e, "Failed to create Certificate Authority");
                return Err(e);
            }
        };
        self.metrics.record_ca_generated();

        *cell = Some(record.clone());
        Ok(record)
    }

    /// Delete the certificate file and forget the CA.
    ///
    /// Deletion failures are logged and counted, never returned. The cell is
    /// cleared either way; a file that could not be removed stays orphaned.
    pub fn cleanup(&self) {
        let mut cell = self.lock();

        let Some(record) = cell.take() else {
            return;
        };

        let path = record.cert_file_path();
        match fs::remove_file(path) {
            Ok(()) => info!(path = %path.display(), "Deleted temporary certificate file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Temporary certificate file was already removed")
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to delete temporary certificate file"
                );
                self.metrics.record_cleanup_failure(RESOURCE_CERTIFICATE);
            }
        }
    }

    /// Current state, checking the filesystem for a held record.
    pub fn state(&self) -> CaState {
        match self.lock().as_ref() {
            None => CaState::Absent,
            Some(record) if record.is_missing_on_disk() => CaState::MemoryOnly,
            Some(_) => CaState::OnDisk,
        }
    }
}

impl std::fmt::Debug for CaLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaLifecycleManager").field("version", &self.version).finish_non_exhaustive()
    }
}

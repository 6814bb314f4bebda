//! Process-lifetime resources shared between commands and the cleanup workflow.

use std::sync::Arc;

use crate::ca::{CaGenerator, CaLifecycleManager, CaRecord};
use crate::config::Configuration;
use crate::errors::CaError;
use crate::workspace::TempDirectoryReaper;

/// The one CA manager and temp directory reaper for this process.
///
/// Construct once at startup and hand out `Arc<GlobalResources>`.
#[derive(Debug)]
pub struct GlobalResources {
    ca: CaLifecycleManager,
    temp_directory: TempDirectoryReaper,
}

impl GlobalResources {
    pub fn new(generator: Arc<dyn CaGenerator>, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            ca: CaLifecycleManager::new(generator, version.clone()),
            temp_directory: TempDirectoryReaper::new(version),
        }
    }

    /// Resources backed by the rcgen CA generator.
    pub fn with_rcgen(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            ca: CaLifecycleManager::with_rcgen(version.clone()),
            temp_directory: TempDirectoryReaper::new(version),
        }
    }

    pub fn ca(&self) -> &CaLifecycleManager {
        &self.ca
    }

    pub fn temp_directory(&self) -> &TempDirectoryReaper {
        &self.temp_directory
    }

    /// Shorthand for `ca().get_or_create(config)`.
    pub fn certificate_authority(&self, config: &Configuration) -> Result<CaRecord, CaError> {
        self.ca.get_or_create(config)
    }
}

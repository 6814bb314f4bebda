//! Best-effort removal of the per-process temporary directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::observability::metrics::{MetricsRecorder, RESOURCE_TEMP_DIRECTORY};
use crate::utils;

/// Removes `<cache_path>/<version>/tmp/pid<pid>`. Holds no state beyond the
/// version used to compute the path, so it can run any number of times.
#[derive(Debug, Clone)]
pub struct TempDirectoryReaper {
    version: String,
    metrics: MetricsRecorder,
}

impl TempDirectoryReaper {
    pub fn new(version: impl Into<String>) -> Self {
        Self { version: version.into(), metrics: MetricsRecorder::new() }
    }

    /// Directory this reaper would remove for `config`.
    pub fn temporary_directory(&self, config: &Configuration) -> PathBuf {
        utils::temporary_directory(&config.cache_path(), &self.version)
    }

    /// Recursively delete the temporary directory. Failures are only logged.
    pub fn cleanup(&self, config: &Configuration) {
        if config.cache_path().as_os_str().is_empty() {
            // Would resolve relative to the working directory.
            warn!("No cache path configured, skipping temporary directory cleanup");
            return;
        }

        let directory = self.temporary_directory(config);
        match fs::remove_dir_all(&directory) {
            Ok(()) => info!(path = %directory.display(), "Deleted temporary directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %directory.display(), "Temporary directory does not exist")
            }
            Err(e) => {
                warn!(
                    path = %directory.display(),
                    error = %e,
                    "Failed to delete temporary directory"
                );
                self.metrics.record_cleanup_failure(RESOURCE_TEMP_DIRECTORY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CACHE_PATH;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn config_with_cache(path: String) -> Configuration {
        Configuration::from_overrides([(CACHE_PATH, path)]).unwrap()
    }

    #[test]
    fn test_removes_tree() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with_cache(temp_dir.path().display().to_string());
        let reaper = TempDirectoryReaper::new("1.0.0");

        let directory = reaper.temporary_directory(&config);
        fs::create_dir_all(directory.join("nested")).unwrap();
        fs::write(directory.join("nested").join("file"), b"data").unwrap();

        reaper.cleanup(&config);
        assert!(!directory.exists());
        // The version cache directory itself is left alone.
        assert!(utils::version_cache_directory(temp_dir.path(), "1.0.0").exists());
    }

    #[traced_test]
    #[test]
    fn test_missing_directory_is_not_a_failure() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with_cache(temp_dir.path().display().to_string());
        let reaper = TempDirectoryReaper::new("1.0.0");

        reaper.cleanup(&config);
        reaper.cleanup(&config);

        assert!(!logs_contain("Failed to delete temporary directory"));
    }

    #[traced_test]
    #[test]
    fn test_delete_failure_is_logged_not_returned() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file as the cache path makes every child path unreachable.
        let cache_file = temp_dir.path().join("cache");
        fs::write(&cache_file, b"not a directory").unwrap();
        let reaper = TempDirectoryReaper::new("1.0.0");

        reaper.cleanup(&config_with_cache(cache_file.display().to_string()));

        assert!(cache_file.is_file());
        assert!(logs_contain("Failed to delete temporary directory"));
    }

    #[traced_test]
    #[test]
    fn test_empty_cache_path_is_skipped() {
        let reaper = TempDirectoryReaper::new("1.0.0");
        reaper.cleanup(&config_with_cache(String::new()));
        assert!(logs_contain("skipping temporary directory cleanup"));
    }
}

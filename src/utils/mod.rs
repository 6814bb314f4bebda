//! Filesystem helpers shared by the CA generator, the lifecycle manager and
//! the temporary directory reaper.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Per-version cache directory: `<cache_path>/<version>`
pub fn version_cache_directory(cache_path: &Path, version: &str) -> PathBuf {
    cache_path.join(version)
}

/// Per-process scratch directory: `<cache_path>/<version>/tmp/pid<pid>`
pub fn temporary_directory(cache_path: &Path, version: &str) -> PathBuf {
    version_cache_directory(cache_path, version)
        .join("tmp")
        .join(format!("pid{}", std::process::id()))
}

/// Write `contents` to `path`, creating missing parent directories first.
pub fn write_to_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// `false` only when the filesystem says the path definitely does not exist.
///
/// Permission and other I/O errors count as present so that callers never
/// rewrite or regenerate on an ambiguous answer.
pub fn path_exists(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(e) => !matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory),
    }
}

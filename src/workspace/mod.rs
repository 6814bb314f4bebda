//! The tool's per-process scratch space.

pub mod reaper;

pub use reaper::TempDirectoryReaper;

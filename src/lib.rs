//! # intercept-ca
//!
//! Lifecycle management for the transient Certificate Authority a
//! command-line tool uses to intercept TLS traffic, plus the teardown of the
//! tool's temporary directory when it exits.
//!
//! ## Architecture
//!
//! ```text
//! CLI / callers ──► CaLifecycleManager::get_or_create ──► CaGenerator (rcgen)
//!                          │  create / restore / regenerate under one lock
//!                          ▼
//! Engine ──► internal.cleanup ──► CaLifecycleManager::cleanup ──► TempDirectoryReaper::cleanup
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use intercept_ca::config::Configuration;
//! use intercept_ca::workflow::{global_cleanup_id, init_cleanup, Engine};
//! use intercept_ca::{GlobalResources, Result, VERSION};
//!
//! fn main() -> Result<()> {
//!     let configuration = Configuration::load(None, Vec::<(&str, String)>::new())?;
//!     let resources = Arc::new(GlobalResources::with_rcgen(VERSION));
//!
//!     let mut engine = Engine::new(configuration.clone());
//!     init_cleanup(&mut engine, resources.clone())?;
//!
//!     let ca = resources.certificate_authority(&configuration)?;
//!     println!("CA certificate at {}", ca.cert_file_path().display());
//!
//!     engine.invoke(&global_cleanup_id(), Vec::new())?;
//!     Ok(())
//! }
//! ```

pub mod ca;
pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;
pub mod resources;
pub mod utils;
pub mod workflow;
pub mod workspace;

// Re-export commonly used types and traits
pub use ca::{CaGenerator, CaLifecycleManager, CaRecord, CaState, RcgenCaGenerator};
pub use config::Configuration;
pub use errors::{CaError, Error, Result};
pub use resources::GlobalResources;
pub use workspace::TempDirectoryReaper;

// Paths used by exported macros so callers need no direct dependency.
#[doc(hidden)]
pub mod __private {
    pub use tracing;
    pub use uuid;
}

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

//! # Interception CA
//!
//! Creation, restoration and teardown of the transient CA used for TLS
//! interception.

pub mod generator;
pub mod manager;
pub mod record;

pub use generator::{CaGenerator, RcgenCaGenerator};
pub use manager::{CaLifecycleManager, CaState};
pub use record::{CaRecord, PrivateKeyPem};

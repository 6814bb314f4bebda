//! # Observability Infrastructure
//!
//! Structured logging through `tracing` and counters through the `metrics`
//! facade. Cleanup paths report their failures here instead of returning them.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::MetricsRecorder;

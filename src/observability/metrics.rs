//! # Metrics Collection
//!
//! Counters for the CA lifecycle and the shutdown cleanup. Values go through
//! the `metrics` facade and are dropped unless the host installs a recorder.

use metrics::{counter, describe_counter};

/// Label value for certificate file cleanup failures
pub const RESOURCE_CERTIFICATE: &str = "certificate";

/// Label value for temporary directory cleanup failures
pub const RESOURCE_TEMP_DIRECTORY: &str = "temp_directory";

/// Metrics recorder for the interception CA
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Register metric descriptions with the installed recorder
    pub fn describe(&self) {
        describe_counter!("ca_generations_total", "Interception CAs generated");
        describe_counter!("ca_generation_failures_total", "Failed interception CA generations");
        describe_counter!(
            "ca_restorations_total",
            "CA certificate files rewritten from the in-memory copy"
        );
        describe_counter!(
            "cleanup_failures_total",
            "Best-effort cleanup steps that failed, by resource"
        );
    }

    /// Record a newly generated CA
    pub fn record_ca_generated(&self) {
        counter!("ca_generations_total").increment(1);
    }

    /// Record a failed CA generation
    pub fn record_ca_generation_failed(&self) {
        counter!("ca_generation_failures_total").increment(1);
    }

    /// Record a certificate file restored from memory
    pub fn record_ca_restored(&self) {
        counter!("ca_restorations_total").increment(1);
    }

    /// Record a swallowed cleanup failure
    pub fn record_cleanup_failure(&self, resource: &'static str) {
        let labels = [("resource", resource)];
        counter!("cleanup_failures_total", &labels).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let recorder = MetricsRecorder::new();
        recorder.describe();
        recorder.record_ca_generated();
        recorder.record_ca_generation_failed();
        recorder.record_ca_restored();
        recorder.record_cleanup_failure(RESOURCE_CERTIFICATE);
        recorder.record_cleanup_failure(RESOURCE_TEMP_DIRECTORY);
    }
}

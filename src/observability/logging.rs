//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::ObservabilityConfig;

/// Create a tracing span for a workflow invocation
///
/// ```rust,ignore
/// let span = workflow_span!("internal.cleanup");
/// ```
#[macro_export]
macro_rules! workflow_span {
    ($workflow:expr) => {
        $crate::__private::tracing::info_span!(
            "workflow",
            workflow = %$workflow,
            invocation_id = %$crate::__private::uuid::Uuid::new_v4()
        )
    };
    ($workflow:expr, $($field:tt)*) => {
        $crate::__private::tracing::info_span!(
            "workflow",
            workflow = %$workflow,
            invocation_id = %$crate::__private::uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Installing twice is
/// not an error; the first subscriber stays in place.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let result = if config.json_logging {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_env_filter(filter)
                .json()
                .with_writer(std::io::stderr)
                .finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr).finish(),
        )
    };

    if result.is_err() {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
        tracing::debug!("global tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        let _span = workflow_span!("internal.cleanup");
        let _span = workflow_span!("internal.cleanup", input_count = 0);
    }
}

//! # Error Handling
//!
//! Error types for the interception CA tooling, defined with `thiserror`.
//! Cleanup failures never show up here: they are logged and counted at the
//! point where they happen.

mod ca;

pub use ca::CaError;

/// Custom result type for intercept-ca operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for intercept-ca
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// CA creation or restoration errors
    #[error(transparent)]
    Ca(#[from] CaError),

    /// Workflow registration and dispatch errors
    #[error("Workflow error: {0}")]
    Workflow(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new workflow error
    pub fn workflow<S: Into<String>>(message: S) -> Self {
        Self::Workflow(message.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ca_error_is_transparent() {
        let err: Error = CaError::generator("boom").into();
        assert_eq!(err.to_string(), "CA generator failed: boom");
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(Error::config("x"), Error::Config(_)));
        assert!(matches!(Error::workflow("x"), Error::Workflow(_)));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: Error = config::ConfigError::Message("bad key".into()).into();
        assert!(matches!(err, Error::Config(ref message) if message == "bad key"));
    }
}

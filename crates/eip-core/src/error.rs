//! Error types for the provisioning workflow
//!
//! The workflow distinguishes exactly two failure categories at runtime:
//! the calling environment has no usable cloud credentials, or the cloud
//! API rejected a call for any other reason. A third category covers
//! configuration problems caught before any API call is made.

use thiserror::Error;

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the provisioning workflow
#[derive(Error, Debug)]
pub enum Error {
    /// The environment provides no usable cloud credentials
    #[error("credentials not available")]
    CredentialsUnavailable,

    /// Any other failure returned by the cloud provider's API
    #[error("cloud API error: {0}")]
    Api(String),

    /// Configuration errors (caught before any API call)
    #[error("configuration error: {0}")]
    Config(String),
}

/// Runtime failure category, used for console reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials could not be resolved
    Credentials,
    /// Generic client/API failure
    Api,
}

impl Error {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The failure category this error reports as
    ///
    /// Configuration errors never reach the workflow, so everything that is
    /// not a credentials failure reports as a generic API failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CredentialsUnavailable => ErrorKind::Credentials,
            Error::Api(_) | Error::Config(_) => ErrorKind::Api,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Api(err.to_string())
    }
}

//! Error handling for the curlgen script generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Only failures to load or parse
//! the source description are expected to reach callers; sample synthesis and
//! log sink failures are absorbed where they happen.
//!
//! # Examples
//!
//! ```
//! use curlgen_core::error::{Error, Result};
//!
//! fn might_fail(path: &str) -> Result<()> {
//!     if path.is_empty() {
//!         return Err(Error::config("no OpenAPI path given"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_fail("").is_err());
//! ```

use thiserror::Error;

/// Result type for curlgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for curlgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The source description could not be fetched or understood
    #[error("OpenAPI error: {0}")]
    OpenApi(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new OpenAPI error
    pub fn openapi<S: Into<String>>(msg: S) -> Self {
        Self::OpenApi(msg.into())
    }
}

//! OpenAPI description loading.
//!
//! This module loads an OpenAPI (or Swagger 2.0) document from a local file or
//! an HTTP(S) URL and converts it into the read-only [`ApiDescription`] model
//! the generator consumes.
//!
//! # Examples
//!
//! ```no_run
//! use curlgen_core::openapi::OpenApiContext;
//! use curlgen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let spec = OpenApiContext::from_file_or_url("openapi.yaml").await?;
//! if let Some(title) = spec.title() {
//!     println!("API Title: {}", title);
//! }
//!
//! let description = spec.description()?;
//! for (route, operation) in description.operations() {
//!     println!("{} {}", operation.method, route);
//! }
//! # Ok(())
//! # }
//! ```

mod convert;
pub mod types;

pub use convert::MAX_SCHEMA_DEPTH;
pub use types::{
    ApiDescription, HttpMethod, MediaType, Operation, Parameter, ParameterLocation, PathItem,
    RequestBody, Schema, SchemaKind,
};

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde_json::Value as JsonValue;
use tokio::fs;

/// A loaded OpenAPI document
#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct OpenApiContext {
    /// The raw JSON value of the document, in document key order
    pub json: JsonValue,
}

impl OpenApiContext {
    /// Load a document from a file or URL (supports both YAML and JSON)
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> crate::Result<Self> {
        let location = location.as_ref();
        let lower = location.to_ascii_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Self::from_url(location).await;
        }

        Self::from_file(location).await
    }

    /// Load a document from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| {
            crate::Error::openapi(format!(
                "Failed to read OpenAPI spec at {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse_content(&content).map_err(|e| {
            crate::Error::openapi(format!(
                "Failed to parse OpenAPI spec at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load a document from a URL (supports both YAML and JSON)
    pub async fn from_url(url: &str) -> crate::Result<Self> {
        let response = reqwest::get(url).await.map_err(|e| {
            crate::Error::openapi(format!("Failed to fetch OpenAPI spec from {}: {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(crate::Error::openapi(format!(
                "Failed to fetch OpenAPI spec from {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response.text().await.map_err(|e| {
            crate::Error::openapi(format!("Failed to read response from {}: {}", url, e))
        })?;

        Self::parse_content(&content).map_err(|e| {
            crate::Error::openapi(format!("Failed to parse OpenAPI spec from {}: {}", url, e))
        })
    }

    /// Parse content as either JSON or YAML
    pub fn parse_content(content: &str) -> Result<Self, String> {
        // Try to parse as JSON first
        if let Ok(json) = serde_json::from_str(content) {
            return Self::checked(json);
        }

        // If JSON parsing fails, try YAML
        if let Ok(json) = serde_yaml::from_str(content) {
            return Self::checked(json);
        }

        Err("content is neither valid JSON nor YAML".to_string())
    }

    fn checked(json: JsonValue) -> Result<Self, String> {
        if json.is_object() {
            Ok(Self { json })
        } else {
            Err("document root is not an object".to_string())
        }
    }

    /// Get a reference to the raw JSON value
    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }
}

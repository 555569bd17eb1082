//! Generation settings for curlgen.
//!
//! This module defines the `Settings` struct holding everything a generation
//! run reads. Settings are resolved once, before generation starts, and are
//! only ever read afterwards. They can be built programmatically or loaded
//! from a YAML, JSON or TOML file.
//!
//! # Examples
//!
//! ```no_run
//! use curlgen_core::config::Settings;
//!
//! # #[tokio::main]
//! # async fn main() -> curlgen_core::Result<()> {
//! // Create settings programmatically
//! let mut settings = Settings::new("openapi.yaml");
//! settings.skip_certificate_check = true;
//!
//! // Or load them from a file
//! let settings = Settings::from_file("curlgen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Default media type for the `Accept` header and operations without a body
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path or URL of the OpenAPI description
    pub openapi_path: String,

    /// Diagnostic log file. `None` disables the log sink.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Value sent in the `Authorization` header of every request
    #[serde(default)]
    pub authorization_header: Option<String>,

    /// Media type used for `Accept` and as the fallback `Content-Type`
    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Prefix placed in front of the description's server URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Emit `--insecure` on every request
    #[serde(default)]
    pub skip_certificate_check: bool,

    /// Read request bodies from standard input instead of embedding samples
    #[serde(default)]
    pub read_body_from_stdin: bool,

    /// Bind script parameters to environment variables
    #[serde(default)]
    pub environment_parameters: bool,

    /// Fall back to a parameter's declared default when a required value is empty
    #[serde(default)]
    pub required_default: bool,

    /// File used both to send and to persist cookies
    #[serde(default)]
    pub cookie_file: Option<String>,

    /// Extra options appended verbatim to every curl invocation
    #[serde(default)]
    pub extra_options: Option<String>,
}

impl Settings {
    /// Create settings for the given description with every option at its default
    pub fn new(openapi_path: impl Into<String>) -> Self {
        Self {
            openapi_path: openapi_path.into(),
            log_file: None,
            authorization_header: None,
            content_type: default_content_type(),
            base_url: None,
            skip_certificate_check: false,
            read_body_from_stdin: false,
            environment_parameters: false,
            required_default: false,
            cookie_file: None,
            extra_options: None,
        }
    }

    /// Load settings from a file, picking the format from its extension
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let settings = match SettingsFormat::of(path) {
            SettingsFormat::Json => serde_json::from_str(&content)?,
            SettingsFormat::Toml => toml::from_str(&content).map_err(|e| {
                Error::config(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            SettingsFormat::Yaml => serde_yaml::from_str(&content)?,
        };
        Ok(settings)
    }

    /// Save settings to a file, picking the format from its extension
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match SettingsFormat::of(path) {
            SettingsFormat::Json => serde_json::to_string_pretty(self)?,
            SettingsFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                Error::config(format!("Failed to serialize settings: {}", e))
            })?,
            SettingsFormat::Yaml => serde_yaml::to_string(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Whether the description is fetched over HTTP(S)
    pub fn is_remote_source(&self) -> bool {
        let lower = self.openapi_path.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(String::new())
    }
}

enum SettingsFormat {
    Json,
    Toml,
    Yaml,
}

impl SettingsFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_settings() -> Settings {
        let mut settings = Settings::new("https://petstore3.swagger.io/api/v3/openapi.json");
        settings.authorization_header = Some("Bearer token".to_string());
        settings.base_url = Some("https://api.example.com".to_string());
        settings.skip_certificate_check = true;
        settings.cookie_file = Some("cookies.txt".to_string());
        settings
    }

    #[tokio::test]
    async fn test_settings_roundtrip_all_formats() -> crate::Result<()> {
        let dir = tempdir()?;
        let settings = sample_settings();

        for name in ["settings.yaml", "settings.json", "settings.toml"] {
            let file_path = dir.path().join(name);
            settings.save(&file_path).await?;
            let loaded = Settings::from_file(&file_path).await?;
            assert_eq!(loaded, settings, "roundtrip through {}", name);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_use_defaults() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("minimal.yaml");
        tokio::fs::write(&file_path, "openapi_path: petstore.json\n").await?;

        let loaded = Settings::from_file(&file_path).await?;
        assert_eq!(loaded, Settings::new("petstore.json"));
        assert_eq!(loaded.content_type, DEFAULT_CONTENT_TYPE);
        Ok(())
    }

    #[test]
    fn test_is_remote_source() {
        assert!(Settings::new("HTTPS://example.com/openapi.json").is_remote_source());
        assert!(Settings::new("http://localhost/spec.yaml").is_remote_source());
        assert!(!Settings::new("./spec/openapi.json").is_remote_source());
    }
}

//! Configuration for the admin API client and the upload gate.

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the admin API.
///
/// # Examples
///
/// ```no_run
/// use admin::config::AdminApiConfig;
///
/// let config = AdminApiConfig {
///     base_url: "https://example.com/ghost/api/admin".to_string(),
///     accept_version: Some("v5.0".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct AdminApiConfig {
    /// Base URL the theme endpoints are resolved against
    #[serde(default)]
    pub base_url: String,
    /// Value of the `Accept-Version` header, when the API requires one
    #[serde(default)]
    pub accept_version: Option<String>,
    /// Value of the `Authorization` header
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AdminApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            accept_version: None,
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AdminApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins `path` onto the base URL with exactly one slash between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Client-side acceptance rules for uploaded archives.
#[derive(Clone, Debug, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_media_types")]
    pub accepted_media_types: Vec<String>,
    #[serde(default = "default_extensions")]
    pub accepted_extensions: Vec<String>,
}

fn default_media_types() -> Vec<String> {
    vec![
        "application/zip".to_string(),
        "application/x-zip-compressed".to_string(),
    ]
}

fn default_extensions() -> Vec<String> {
    vec!["zip".to_string()]
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            accepted_media_types: default_media_types(),
            accepted_extensions: default_extensions(),
        }
    }
}

impl UploadConfig {
    pub fn accepts_media_type(&self, media_type: &str) -> bool {
        self.accepted_media_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(media_type.trim()))
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.accepted_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_single_slash() {
        let config = AdminApiConfig {
            base_url: "http://localhost:2368/api/admin/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint("/themes/upload"),
            "http://localhost:2368/api/admin/themes/upload"
        );
    }

    #[test]
    fn test_upload_defaults_accept_zip() {
        let config = UploadConfig::default();
        assert!(config.accepts_media_type("application/zip"));
        assert!(config.accepts_media_type("Application/X-Zip-Compressed"));
        assert!(!config.accepts_media_type("text/plain"));
        assert!(config.accepts_extension("ZIP"));
        assert!(!config.accepts_extension("tar"));
    }
}

use super::LoggingConfig;
use super::validation::ConfigValidationError;
use admin::config::{AdminApiConfig, UploadConfig};
use serde::Deserialize;

/// Longest request timeout accepted from configuration.
pub const MAX_TIMEOUT_SECS: u64 = 600;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    api: AdminApiConfig,
    #[serde(default)]
    upload: UploadConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

impl AppConfig {
    pub fn api(&self) -> &AdminApiConfig {
        &self.api
    }

    pub fn upload(&self) -> &UploadConfig {
        &self.upload
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Checks every setting and returns all problems at once.
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            errors.push(ConfigValidationError::MissingBaseUrl);
        } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            errors.push(ConfigValidationError::InvalidBaseUrl {
                configured: base_url.to_string(),
            });
        }

        if self.api.timeout_secs == 0 || self.api.timeout_secs > MAX_TIMEOUT_SECS {
            errors.push(ConfigValidationError::Timeout {
                configured: self.api.timeout_secs,
                min_limit: 1,
                max_limit: MAX_TIMEOUT_SECS,
            });
        }

        if self.upload.accepted_media_types.is_empty() && self.upload.accepted_extensions.is_empty() {
            errors.push(ConfigValidationError::NoAcceptedArchiveTypes);
        }

        let level = self.logging.level().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::LogLevel {
                configured: self.logging.level().to_string(),
            });
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

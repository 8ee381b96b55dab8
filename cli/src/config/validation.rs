/// Problems found in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing api.base_url")]
    MissingBaseUrl,
    #[error("Invalid api.base_url: {configured}")]
    InvalidBaseUrl { configured: String },
    #[error("Invalid api.timeout_secs: {configured} (min: {min_limit}, max: {max_limit})")]
    Timeout {
        configured: u64,
        min_limit: u64,
        max_limit: u64,
    },
    #[error("No accepted archive media types or extensions")]
    NoAcceptedArchiveTypes,
    #[error("Invalid logging.level: {configured}")]
    LogLevel { configured: String },
}

impl ConfigValidationError {
    /// Explanation suitable for printing straight to the terminal.
    pub fn user_message(&self) -> String {
        match self {
            ConfigValidationError::MissingBaseUrl => "Admin API address not configured!\n\n\
                Set api.base_url in config.toml or THEMEKEEPER_API__BASE_URL in the environment."
                .to_string(),
            ConfigValidationError::InvalidBaseUrl { configured } => {
                format!(
                    "Admin API address is not an HTTP URL!\n\n\
                    Your configured value: {configured}\n\n\
                    Please update api.base_url to start with http:// or https://."
                )
            }
            ConfigValidationError::Timeout {
                configured,
                min_limit,
                max_limit,
            } => {
                format!(
                    "Request timeout out of range!\n\n\
                    Your configured value: {configured} seconds\n\
                    Valid range: {min_limit} - {max_limit} seconds\n\n\
                    Please update api.timeout_secs in config.toml."
                )
            }
            ConfigValidationError::NoAcceptedArchiveTypes => "No archive type can be uploaded!\n\n\
                Please list at least one entry in upload.accepted_media_types or upload.accepted_extensions."
                .to_string(),
            ConfigValidationError::LogLevel { configured } => {
                format!(
                    "Unknown log level!\n\n\
                    Your configured value: {configured}\n\
                    Valid values: trace, debug, info, warn, error"
                )
            }
        }
    }
}

pub enum ConfigLoadResult {
    Success(Box<super::AppConfig>),
    LoadError(String),
    DeserializeError(String),
}

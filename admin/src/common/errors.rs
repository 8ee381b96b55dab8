use thiserror::Error;

/// Transport-level errors raised while talking to the admin API.
///
/// These describe what went wrong with the HTTP exchange itself, before any
/// response body has been interpreted. [`HttpThemeApi`] turns them into an
/// [`ApiFailure`] so that pipelines only ever see the closed set of
/// boundary outcomes.
///
/// # Error Categories
///
/// ## Client Configuration Errors
/// - [`ClientCreation`] - HTTP client initialization failures
///
/// ## Request Execution Errors
/// - [`RequestFailed`] - General request failures with URL and reason
/// - [`Timeout`] - Request timeout with duration and target URL
/// - [`InvalidResponse`] - Unexpected response format or content
///
/// # Examples
///
/// ```no_run
/// use admin::common::errors::HttpError;
///
/// fn log_http_error(error: &HttpError) {
///     match error {
///         HttpError::RequestFailed { url, reason } => {
///             log::error!("HTTP request failed: url={}, reason={}", url, reason);
///         }
///         HttpError::Timeout { url, seconds } => {
///             log::warn!("HTTP request timeout: url={}, duration={}s", url, seconds);
///         }
///         _ => {
///             log::error!("HTTP error: {}", error);
///         }
///     }
/// }
/// ```
///
/// [`HttpThemeApi`]: crate::api::client::HttpThemeApi
/// [`ApiFailure`]: crate::api::ApiFailure
/// [`ClientCreation`]: HttpError::ClientCreation
/// [`RequestFailed`]: HttpError::RequestFailed
/// [`Timeout`]: HttpError::Timeout
/// [`InvalidResponse`]: HttpError::InvalidResponse
#[derive(Debug, Error)]
pub enum HttpError {
    /// HTTP client initialization failed.
    ///
    /// Typically caused by an invalid header value in the configuration or a
    /// TLS backend that could not be set up.
    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },

    /// The request could not be sent or the connection dropped.
    #[error("Request failed: {url} - {reason}")]
    RequestFailed { url: String, reason: String },

    /// The request took longer than the configured timeout.
    #[error("Request timeout after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    /// The server answered, but not in the expected shape.
    #[error("Invalid response: expected {expected}, got {actual}")]
    InvalidResponse { expected: String, actual: String },
}

impl HttpError {
    /// Classifies a reqwest error raised while sending a request to `url`.
    pub fn from_reqwest(error: reqwest::Error, url: &str, timeout_seconds: u64) -> Self {
        if error.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
                seconds: timeout_seconds,
            }
        } else if error.is_builder() {
            HttpError::ClientCreation {
                reason: error.to_string(),
            }
        } else {
            HttpError::RequestFailed {
                url: url.to_string(),
                reason: error.to_string(),
            }
        }
    }

    /// Returns `true` when the failure means the server was never reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            HttpError::RequestFailed { .. } | HttpError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = HttpError::Timeout {
            url: "http://localhost/themes".to_string(),
            seconds: 30,
        };
        assert_eq!(
            error.to_string(),
            "Request timeout after 30s: http://localhost/themes"
        );
        assert!(error.is_connectivity());
    }

    #[test]
    fn test_invalid_response_is_not_connectivity() {
        let error = HttpError::InvalidResponse {
            expected: "JSON theme list".to_string(),
            actual: "empty body".to_string(),
        };
        assert!(!error.is_connectivity());
    }
}

use crate::api::ApiFailure;
use crate::model::ValidationIssue;
use std::fmt;

/// Why a theme may not be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionReason {
    /// The theme is the bundled reference theme
    DefaultTheme,
    /// The theme is the one currently serving the site
    ActiveTheme,
}

impl fmt::Display for ProtectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtectionReason::DefaultTheme => write!(f, "the default theme cannot be deleted"),
            ProtectionReason::ActiveTheme => write!(f, "the active theme cannot be deleted"),
        }
    }
}

/// Errors produced by the theme lifecycle operations.
///
/// Client-side rejections ([`is_local`](Self::is_local)) never contact the
/// admin API. Everything else originates from the server or the transport.
///
/// # Error Categories
///
/// ## Local
/// - [`UnsupportedMediaType`] - the archive is not an accepted archive type
/// - [`DefaultThemeOverwrite`] - the archive would replace the default theme
/// - [`ProtectedTheme`] - deletion of the active or default theme
/// - [`NotFound`] - registry operation on an unknown theme id
/// - [`InvalidTransition`] - upload requested outside the `Idle` state
///
/// ## Remote
/// - [`Validation`] - structured validation failure with one or more issues
/// - [`Remote`] - any other failure message from the server
/// - [`Network`] - the server could not be reached
///
/// [`UnsupportedMediaType`]: ThemeError::UnsupportedMediaType
/// [`DefaultThemeOverwrite`]: ThemeError::DefaultThemeOverwrite
/// [`ProtectedTheme`]: ThemeError::ProtectedTheme
/// [`NotFound`]: ThemeError::NotFound
/// [`InvalidTransition`]: ThemeError::InvalidTransition
/// [`Validation`]: ThemeError::Validation
/// [`Remote`]: ThemeError::Remote
/// [`Network`]: ThemeError::Network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThemeError {
    #[error("The file type you uploaded is not supported: {filename} ({media_type})")]
    UnsupportedMediaType { filename: String, media_type: String },

    #[error(
        "Sorry, the default theme cannot be overwritten. Please rename your zip file and try again."
    )]
    DefaultThemeOverwrite { filename: String },

    #[error("Theme '{id}' is protected: {reason}")]
    ProtectedTheme { id: String, reason: ProtectionReason },

    #[error("Theme validation failed with {} issue(s)", issues.len())]
    Validation { issues: Vec<ValidationIssue> },

    #[error("Theme not found: {id}")]
    NotFound { id: String },

    #[error("{message}")]
    Remote { status: Option<u16>, message: String },

    #[error("Unable to reach the theme service: {reason}")]
    Network { reason: String },

    #[error("Cannot start an upload while the upload is {state}")]
    InvalidTransition { state: String },
}

/// Rule shown for failures caused by connectivity problems.
pub const CONNECTIVITY_RULE: &str =
    "The request could not be completed. Check your connection and try again.";

impl ThemeError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn protected(id: impl Into<String>, reason: ProtectionReason) -> Self {
        Self::ProtectedTheme {
            id: id.into(),
            reason,
        }
    }

    /// Returns `true` for errors detected without contacting the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ThemeError::UnsupportedMediaType { .. }
                | ThemeError::DefaultThemeOverwrite { .. }
                | ThemeError::ProtectedTheme { .. }
                | ThemeError::NotFound { .. }
                | ThemeError::InvalidTransition { .. }
        )
    }

    /// Returns `true` for the structured validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, ThemeError::Validation { .. })
    }

    /// Returns `true` when the failure carries only a single message, i.e.
    /// it is shown through the notification sink rather than the report.
    pub fn is_single_message(&self) -> bool {
        matches!(
            self,
            ThemeError::Remote { .. } | ThemeError::Network { .. }
        )
    }

    /// Flattens the error into issues for the shared report.
    ///
    /// Structured validation failures return their issues verbatim. Every
    /// other error becomes a single synthetic error-level issue whose rule is
    /// the error message.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        match self {
            ThemeError::Validation { issues } => issues.clone(),
            ThemeError::Network { reason } => {
                vec![ValidationIssue::error(CONNECTIVITY_RULE).with_details(reason.clone())]
            }
            other => vec![ValidationIssue::error(other.to_string())],
        }
    }
}

impl From<ApiFailure> for ThemeError {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Validation { issues } => ThemeError::Validation { issues },
            ApiFailure::Message { status, text } => ThemeError::Remote {
                status,
                message: text,
            },
            ApiFailure::Network { reason } => ThemeError::Network { reason },
        }
    }
}

// Result type alias for convenience
pub type ThemeResult<T> = Result<T, ThemeError>;

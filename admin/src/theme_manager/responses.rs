use crate::errors::ThemeError;
use crate::labels::ThemeLabel;
use crate::model::Theme;
use crate::pipeline::{ActivationResult, DeletionResult, UploadResult};
use crate::templates::TemplateSelection;

/// Responses produced by [`ThemeManager`](super::ThemeManager).
///
/// Pipeline commands report their own failures inside the result value.
/// [`ThemeResponse::Error`] is reserved for commands that could not run at
/// all, such as a listing that never reached the server.
#[derive(Debug, Clone)]
pub enum ThemeResponse {
    Themes {
        themes: Vec<Theme>,
    },

    Labels {
        labels: Vec<ThemeLabel>,
    },

    /// `None` when no theme is active; the selector should stay hidden.
    Templates {
        selection: Option<TemplateSelection>,
    },

    /// The archive would replace `existing`; resend with `overwrite` set.
    OverwriteConfirmationRequired {
        existing: Theme,
    },

    Uploaded {
        result: UploadResult,
        /// Present when activation was requested and the upload succeeded
        activation: Option<ActivationResult>,
    },

    Activated {
        result: ActivationResult,
    },

    Deleted {
        result: DeletionResult,
    },

    Error {
        error: ThemeError,
    },
}

impl ThemeResponse {
    /// The failure carried by this response, wherever it sits.
    pub fn error(&self) -> Option<&ThemeError> {
        match self {
            ThemeResponse::Error { error }
            | ThemeResponse::Uploaded {
                result: UploadResult::Failed { error, .. },
                ..
            }
            | ThemeResponse::Uploaded {
                activation: Some(ActivationResult::Failed { error, .. }),
                ..
            }
            | ThemeResponse::Activated {
                result: ActivationResult::Failed { error, .. },
            }
            | ThemeResponse::Deleted {
                result: DeletionResult::Failed { error },
            } => Some(error),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error().is_some()
    }
}

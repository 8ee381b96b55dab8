//! Mutating theme operations.
//!
//! Each pipeline resolves its network round trip completely before touching
//! the registry, and returns its outcome as a value. Callers always match on
//! a `Failed` variant; nothing is thrown across this boundary.

pub mod activation;
pub mod deletion;
pub mod upload;

pub use activation::{ActivationPipeline, ActivationResult};
pub use deletion::{DeletionPipeline, DeletionResult};
pub use upload::{UploadPipeline, UploadResult, UploadState};

use crate::errors::ThemeError;
use crate::notify::{AlertLevel, Notifier};
use crate::report::SafeText;

/// Sends single-message failures to the alert sink.
///
/// Structured validation failures are left to the caller's report.
pub(crate) fn notify_failure(notifier: &dyn Notifier, error: &ThemeError) {
    if error.is_single_message() {
        notifier.display(&SafeText::new(error.to_string()), AlertLevel::Error);
    }
}

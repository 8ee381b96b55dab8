use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a [`ValidationIssue`].
///
/// Only `Error` issues block an upload or activation. `Warning` issues let
/// the operation proceed but must be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLevel::Error => write!(f, "error"),
            IssueLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A concrete file or location violating a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFailure {
    /// Path or reference inside the theme package
    #[serde(rename = "ref")]
    pub reference: String,
    /// Optional explanation specific to this location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IssueFailure {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A single rule violation or warning produced by theme validation.
///
/// Issues are transient: each upload or activation attempt produces a fresh
/// set. They are kept only inside [`Theme::warnings`](super::Theme) /
/// [`Theme::errors`](super::Theme) or inside a failed outcome.
///
/// The `rule` and `details` texts come from the server and may contain
/// markup. They must only ever be displayed through
/// [`SafeText`](crate::report::SafeText).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    /// Short human-readable rule name
    pub rule: String,
    /// Long-form explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub failures: Vec<IssueFailure>,
    /// Machine-readable rule code, e.g. `GS030-ASSET-REQ`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Fatal errors prevent the package from being installed at all
    #[serde(default)]
    pub fatal: bool,
}

impl ValidationIssue {
    pub fn error(rule: impl Into<String>) -> Self {
        Self::new(IssueLevel::Error, rule)
    }

    pub fn warning(rule: impl Into<String>) -> Self {
        Self::new(IssueLevel::Warning, rule)
    }

    fn new(level: IssueLevel, rule: impl Into<String>) -> Self {
        Self {
            level,
            rule: rule.into(),
            details: None,
            failures: Vec::new(),
            code: None,
            fatal: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_failure(mut self, failure: IssueFailure) -> Self {
        self.failures.push(failure);
        self
    }

    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == IssueLevel::Warning
    }
}

/// Returns `true` when any issue in the list blocks the operation.
pub fn has_blocking_issues(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_error)
}

//! Notification sink for single-message failures.
//!
//! Structured validation results are shown through an
//! [`IssueReport`](crate::report::IssueReport). Plain failure messages go to
//! whatever alert surface the host application provides.

use crate::report::SafeText;
use std::sync::Mutex;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Alert display capability supplied by the host application.
///
/// The message is untrusted: implementations must render it through
/// [`SafeText::as_literal`] or [`SafeText::to_html`].
pub trait Notifier: Send + Sync {
    fn display(&self, message: &SafeText, level: AlertLevel);
}

/// Notifier that forwards alerts to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn display(&self, message: &SafeText, level: AlertLevel) {
        match level {
            AlertLevel::Error => log::error!("{}", message.as_literal()),
            AlertLevel::Warning => log::warn!("{}", message.as_literal()),
            AlertLevel::Success | AlertLevel::Info => log::info!("{}", message.as_literal()),
        }
    }
}

/// Notifier that keeps every alert in memory.
///
/// Useful for hosts that drain alerts into their own UI loop.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    alerts: Mutex<Vec<(SafeText, AlertLevel)>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the alerts received so far.
    pub fn drain(&self) -> Vec<(SafeText, AlertLevel)> {
        match self.alerts.lock() {
            Ok(mut alerts) => std::mem::take(&mut *alerts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for CollectingNotifier {
    fn display(&self, message: &SafeText, level: AlertLevel) {
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push((message.clone(), level)),
            Err(poisoned) => poisoned.into_inner().push((message.clone(), level)),
        }
    }
}

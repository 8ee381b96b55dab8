use admin::errors::ThemeError;
use admin::labels::ThemeLabel;
use admin::model::Theme;
use admin::notify::{AlertLevel, Notifier};
use admin::pipeline::{ActivationResult, DeletionResult, UploadResult};
use admin::report::{IssueReport, SafeText};
use admin::templates::TemplateSelection;
use std::fmt::Write as _;

/// Prints alerts to stderr as literal text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn display(&self, message: &SafeText, level: AlertLevel) {
        let prefix = match level {
            AlertLevel::Success => "ok",
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Error => "error",
        };
        eprintln!("{prefix}: {}", message.as_literal());
    }
}

pub fn render_labels(labels: &[ThemeLabel]) -> String {
    if labels.is_empty() {
        return "No themes installed\n".to_string();
    }

    let width = labels.iter().map(|l| l.label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for ThemeLabel { theme, label } in labels {
        let marker = if theme.active { "*" } else { " " };
        let _ = write!(out, "{marker} {label:<width$}  {}", theme.id);
        if let Some(version) = &theme.version {
            let _ = write!(out, "  v{version}");
        }
        if theme.has_issues() {
            let _ = write!(out, "  ({} issue(s))", theme.warnings.len() + theme.errors.len());
        }
        out.push('\n');
    }
    out
}

pub fn render_themes(themes: &[Theme]) -> String {
    let mut out = String::new();
    for theme in themes {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            theme.id,
            theme.package_name,
            theme.version.as_deref().unwrap_or("-"),
            if theme.active { "active" } else { "" }
        );
    }
    out
}

pub fn render_templates(selection: Option<&TemplateSelection>) -> String {
    let Some(selection) = selection else {
        return "No active theme; custom templates are unavailable\n".to_string();
    };

    if let Some(locked) = &selection.locked {
        return format!("Locked to {} ({})\n", locked.name, locked.filename);
    }
    if !selection.is_selectable() {
        return "No custom templates available\n".to_string();
    }

    let mut out = String::new();
    for template in &selection.options {
        if template.is_default() {
            let _ = writeln!(out, "- {}", template.name);
        } else {
            let _ = writeln!(out, "- {} ({})", template.name, template.filename);
        }
    }
    out
}

/// Single-message failures were already shown by [`TerminalNotifier`].
fn failure_text(error: &ThemeError, report: &IssueReport) -> String {
    if error.is_single_message() {
        String::new()
    } else {
        report.render_text()
    }
}

fn with_report(headline: String, report: &IssueReport) -> String {
    if report.is_empty() {
        format!("{headline}\n")
    } else {
        format!("{headline}\n\n{}", report.render_text())
    }
}

pub fn render_upload(result: &UploadResult) -> String {
    match result {
        UploadResult::Success { theme } => format!("Uploaded theme {}\n", theme.id),
        UploadResult::SuccessWithWarnings { theme, report } => {
            with_report(format!("Uploaded theme {}", theme.id), report)
        }
        UploadResult::Failed { error, report } => failure_text(error, report),
    }
}

pub fn render_activation(result: &ActivationResult) -> String {
    match result {
        ActivationResult::Success { theme } => format!("Activated theme {}\n", theme.id),
        ActivationResult::SuccessWithWarnings { theme, report } => {
            with_report(format!("Activated theme {}", theme.id), report)
        }
        ActivationResult::Failed { error, report } => failure_text(error, report),
    }
}

pub fn render_deletion(result: &DeletionResult) -> String {
    match result {
        DeletionResult::Deleted { id } => format!("Deleted theme {id}\n"),
        DeletionResult::Failed { error } if error.is_single_message() => String::new(),
        DeletionResult::Failed { error } => format!("{error}\n"),
    }
}

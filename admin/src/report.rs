//! Shared display of validation outcomes.
//!
//! Upload and activation present their issues the same way and differ only
//! in the title. Every text that came from the server is wrapped in
//! [`SafeText`], which can be shown as literal text or escaped into HTML but
//! never passed through as markup.

use crate::model::{IssueLevel, ValidationIssue};
use std::fmt;

/// Untrusted text that must be displayed literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeText(String);

impl SafeText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The text exactly as received, for plain-text sinks.
    pub fn as_literal(&self) -> &str {
        &self.0
    }

    /// The text escaped for inclusion in HTML.
    pub fn to_html(&self) -> String {
        escape_html(&self.0)
    }
}

impl fmt::Display for SafeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Which operation the report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    UploadSucceededWithWarnings,
    UploadFailed,
    ActivationSucceededWithWarnings,
    ActivationFailed,
}

impl ReportKind {
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::UploadSucceededWithWarnings => "Upload successful with warnings",
            ReportKind::UploadFailed => "Upload failed",
            ReportKind::ActivationSucceededWithWarnings => "Activation successful with warnings",
            ReportKind::ActivationFailed => "Activation failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFailure {
    pub reference: SafeText,
    pub message: Option<SafeText>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    pub rule: SafeText,
    pub details: Option<SafeText>,
    pub code: Option<SafeText>,
    pub failures: Vec<ReportFailure>,
}

impl From<&ValidationIssue> for ReportItem {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            rule: SafeText::new(issue.rule.clone()),
            details: issue.details.clone().map(SafeText::new),
            code: issue.code.clone().map(SafeText::new),
            failures: issue
                .failures
                .iter()
                .map(|f| ReportFailure {
                    reference: SafeText::new(f.reference.clone()),
                    message: f.message.clone().map(SafeText::new),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: &'static str,
    pub level: IssueLevel,
    pub items: Vec<ReportItem>,
}

/// Issues grouped for display under an operation title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReport {
    pub kind: ReportKind,
    pub sections: Vec<ReportSection>,
}

impl IssueReport {
    /// Groups `issues` into fatal errors, errors and warnings, dropping
    /// empty groups.
    pub fn build(kind: ReportKind, issues: &[ValidationIssue]) -> Self {
        let sections = vec![
            section(issues, "Fatal errors", IssueLevel::Error, |i| i.is_error() && i.fatal),
            section(issues, "Errors", IssueLevel::Error, |i| i.is_error() && !i.fatal),
            section(issues, "Warnings", IssueLevel::Warning, ValidationIssue::is_warning),
        ]
        .into_iter()
        .filter(|s| !s.items.is_empty())
        .collect();

        Self { kind, sections }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn count(&self, level: IssueLevel) -> usize {
        self.sections
            .iter()
            .filter(|s| s.level == level)
            .map(|s| s.items.len())
            .sum()
    }

    /// Plain-text rendering for terminals and logs.
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n", self.title());
        for section in &self.sections {
            out.push_str(&format!("\n{} ({}):\n", section.heading, section.items.len()));
            for item in &section.items {
                out.push_str(&format!("  - {}", item.rule));
                if let Some(code) = &item.code {
                    out.push_str(&format!(" [{code}]"));
                }
                out.push('\n');
                if let Some(details) = &item.details {
                    out.push_str(&format!("    {details}\n"));
                }
                for failure in &item.failures {
                    match &failure.message {
                        Some(message) => {
                            out.push_str(&format!("    * {}: {message}\n", failure.reference))
                        }
                        None => out.push_str(&format!("    * {}\n", failure.reference)),
                    }
                }
            }
        }
        out
    }

    /// HTML rendering with every server-supplied text escaped.
    pub fn render_html(&self) -> String {
        let mut out = format!("<h2>{}</h2>", escape_html(self.title()));
        for section in &self.sections {
            out.push_str(&format!("<h3>{}</h3><ul>", escape_html(section.heading)));
            for item in &section.items {
                out.push_str(&format!("<li><strong>{}</strong>", item.rule.to_html()));
                if let Some(details) = &item.details {
                    out.push_str(&format!("<p>{}</p>", details.to_html()));
                }
                if !item.failures.is_empty() {
                    out.push_str("<ul>");
                    for failure in &item.failures {
                        out.push_str(&format!("<li><code>{}</code>", failure.reference.to_html()));
                        if let Some(message) = &failure.message {
                            out.push_str(&format!(": {}", message.to_html()));
                        }
                        out.push_str("</li>");
                    }
                    out.push_str("</ul>");
                }
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
        out
    }
}

fn section(
    issues: &[ValidationIssue],
    heading: &'static str,
    level: IssueLevel,
    pick: impl Fn(&ValidationIssue) -> bool,
) -> ReportSection {
    ReportSection {
        heading,
        level,
        items: issues.iter().filter(|i| pick(i)).map(ReportItem::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IssueFailure;

    #[test]
    fn test_escape_html_neutralises_script() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_sections_group_by_level_and_fatality() {
        let issues = vec![
            ValidationIssue::warning("Old helper"),
            ValidationIssue::error("Missing package.json").fatal(),
            ValidationIssue::error("Invalid template"),
        ];

        let report = IssueReport::build(ReportKind::UploadFailed, &issues);
        let headings: Vec<_> = report.sections.iter().map(|s| s.heading).collect();
        assert_eq!(headings, vec!["Fatal errors", "Errors", "Warnings"]);
        assert_eq!(report.count(IssueLevel::Error), 2);
        assert_eq!(report.count(IssueLevel::Warning), 1);
    }

    #[test]
    fn test_html_rendering_escapes_server_text() {
        let issues = vec![
            ValidationIssue::warning("<b>rule</b>")
                .with_details("<script>alert(1)</script>")
                .with_failure(IssueFailure::new("index.hbs").with_message("<i>bad</i>")),
        ];

        let html = IssueReport::build(ReportKind::ActivationSucceededWithWarnings, &issues)
            .render_html();
        assert!(html.contains("Activation successful with warnings"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>rule"));
        assert!(html.contains("&lt;i&gt;bad&lt;/i&gt;"));
    }

    #[test]
    fn test_text_rendering_is_literal() {
        let issues = vec![ValidationIssue::error("Use <code>{{asset}}</code>").with_code("GS030")];
        let text = IssueReport::build(ReportKind::UploadFailed, &issues).render_text();

        assert!(text.starts_with("Upload failed"));
        assert!(text.contains("Use <code>{{asset}}</code> [GS030]"));
    }

    #[test]
    fn test_no_issues_is_empty_report() {
        assert!(IssueReport::build(ReportKind::UploadFailed, &[]).is_empty());
    }
}

//! JSON shapes exchanged with the admin API and their decoding.
//!
//! Successful responses wrap themes in `{ "themes": [...] }`. Error responses
//! look like `{ "errors": [{ "errorType", "message", "errorDetails"? }] }`,
//! where `errorDetails` of a `ThemeValidationError` is either an array of
//! issues or an object `{ "errors": [...], "warnings": [...] }`.

use super::ApiFailure;
use crate::common::HttpError;
use crate::model::{
    DocumentKind, IssueFailure, IssueLevel, TemplateDescriptor, Theme, ValidationIssue,
};
use serde::Deserialize;

/// `errorType` of structured validation failures.
pub const THEME_VALIDATION_ERROR: &str = "ThemeValidationError";

#[derive(Debug, Deserialize)]
pub struct ThemesEnvelope {
    #[serde(default)]
    pub themes: Vec<ThemeRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRecord {
    pub filename: String,
    pub name: String,
    #[serde(rename = "for", default)]
    pub applies_to: Vec<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRecord {
    pub name: String,
    #[serde(default)]
    pub package: Option<PackageManifest>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub templates: Vec<TemplateRecord>,
    #[serde(default)]
    pub warnings: Vec<IssueRecord>,
    #[serde(default)]
    pub errors: Vec<IssueRecord>,
}

#[derive(Debug, Deserialize)]
pub struct IssueRecord {
    #[serde(default)]
    pub level: Option<IssueLevel>,
    pub rule: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub failures: Vec<IssueFailure>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub fatal: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IssueDetails {
    List(Vec<IssueRecord>),
    Grouped {
        #[serde(default)]
        errors: Vec<IssueRecord>,
        #[serde(default)]
        warnings: Vec<IssueRecord>,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
pub struct ErrorEntry {
    #[serde(rename = "errorType", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(rename = "errorDetails", alias = "details", default)]
    pub error_details: Option<IssueDetails>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

impl IssueRecord {
    fn into_issue(self, default_level: IssueLevel) -> ValidationIssue {
        ValidationIssue {
            level: self.level.unwrap_or(default_level),
            rule: self.rule,
            details: self.details,
            failures: self.failures,
            code: self.code,
            fatal: self.fatal,
        }
    }
}

impl IssueDetails {
    fn into_issues(self) -> Vec<ValidationIssue> {
        match self {
            IssueDetails::List(records) => records
                .into_iter()
                .map(|r| r.into_issue(IssueLevel::Error))
                .collect(),
            IssueDetails::Grouped { errors, warnings } => errors
                .into_iter()
                .map(|r| r.into_issue(IssueLevel::Error))
                .chain(warnings.into_iter().map(|r| r.into_issue(IssueLevel::Warning)))
                .collect(),
            IssueDetails::Other(_) => Vec::new(),
        }
    }
}

impl From<TemplateRecord> for TemplateDescriptor {
    fn from(record: TemplateRecord) -> Self {
        let mut kinds: Vec<DocumentKind> = record
            .applies_to
            .iter()
            .filter_map(|k| k.parse().ok())
            .collect();
        if kinds.is_empty() {
            kinds = vec![DocumentKind::Post, DocumentKind::Page];
        }

        TemplateDescriptor {
            filename: record.filename,
            name: record.name,
            applies_to: kinds.into_iter().collect(),
            slug_restriction: record.slug.filter(|s| !s.is_empty()),
        }
    }
}

impl From<ThemeRecord> for Theme {
    fn from(record: ThemeRecord) -> Self {
        let (package_name, version) = match record.package {
            Some(manifest) => (manifest.name, manifest.version),
            None => (None, None),
        };

        Theme {
            package_name: package_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| record.name.clone()),
            id: record.name,
            version,
            active: record.active,
            templates: record.templates.into_iter().map(Into::into).collect(),
            warnings: record
                .warnings
                .into_iter()
                .map(|r| r.into_issue(IssueLevel::Warning))
                .collect(),
            errors: record
                .errors
                .into_iter()
                .map(|r| r.into_issue(IssueLevel::Error))
                .collect(),
        }
    }
}

/// Decodes a `{ "themes": [...] }` body.
pub fn decode_theme_list(body: &str) -> Result<Vec<Theme>, HttpError> {
    let envelope: ThemesEnvelope =
        serde_json::from_str(body).map_err(|e| HttpError::InvalidResponse {
            expected: "theme list JSON".to_string(),
            actual: e.to_string(),
        })?;
    Ok(envelope.themes.into_iter().map(Into::into).collect())
}

/// Decodes a `{ "themes": [theme] }` body holding exactly one theme.
pub fn decode_single_theme(body: &str) -> Result<Theme, HttpError> {
    decode_theme_list(body)?
        .into_iter()
        .next()
        .ok_or_else(|| HttpError::InvalidResponse {
            expected: "one theme".to_string(),
            actual: "empty theme list".to_string(),
        })
}

/// Decodes a non-success response body into an [`ApiFailure`].
pub fn decode_failure(status: u16, body: &str) -> ApiFailure {
    let fallback = || {
        let text = body.trim();
        if text.is_empty() || text.starts_with('<') {
            format!("HTTP {status} error")
        } else {
            text.to_string()
        }
    };

    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return ApiFailure::message(Some(status), fallback());
    };
    let Some(entry) = envelope.errors.into_iter().next() else {
        return ApiFailure::message(Some(status), fallback());
    };

    let message = entry
        .message
        .filter(|m| !m.trim().is_empty())
        .or(entry.context)
        .unwrap_or_else(|| format!("HTTP {status} error"));

    if entry.error_type.as_deref() == Some(THEME_VALIDATION_ERROR) {
        let issues = entry
            .error_details
            .map(IssueDetails::into_issues)
            .unwrap_or_default();
        if issues.is_empty() {
            return ApiFailure::Validation {
                issues: vec![ValidationIssue::error(message)],
            };
        }
        return ApiFailure::Validation { issues };
    }

    ApiFailure::message(Some(status), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_record_without_package_uses_folder_name() {
        let body = r#"{"themes": [{"name": "foo", "active": false}]}"#;
        let themes = decode_theme_list(body).unwrap();
        assert_eq!(themes[0].id, "foo");
        assert_eq!(themes[0].package_name, "foo");
        assert!(themes[0].version.is_none());
    }

    #[test]
    fn test_theme_record_with_templates_and_warnings() {
        let body = r#"{"themes": [{
            "name": "casper",
            "package": {"name": "Casper", "version": "5.0.0"},
            "active": true,
            "templates": [
                {"filename": "custom-news-bulletin", "name": "News Bulletin", "for": ["post", "page"], "slug": null},
                {"filename": "post-one", "name": "One", "for": ["post"], "slug": "one"}
            ],
            "warnings": [{"rule": "Missing asset", "code": "GS030-ASSET-REQ"}]
        }]}"#;

        let theme = decode_single_theme(body).unwrap();
        assert_eq!(theme.package_name, "Casper");
        assert_eq!(theme.version.as_deref(), Some("5.0.0"));
        assert!(theme.active);
        assert_eq!(theme.templates.len(), 2);
        assert!(theme.templates[0].applies_to(DocumentKind::Page));
        assert_eq!(theme.templates[1].slug_restriction.as_deref(), Some("one"));
        assert!(!theme.templates[1].applies_to(DocumentKind::Page));
        assert_eq!(theme.warnings[0].level, IssueLevel::Warning);
    }

    #[test]
    fn test_empty_theme_list_is_invalid_for_single_theme() {
        assert!(decode_single_theme(r#"{"themes": []}"#).is_err());
    }

    #[test]
    fn test_validation_error_with_issue_array() {
        let body = r#"{"errors": [{
            "errorType": "ThemeValidationError",
            "message": "Theme is not compatible or contains errors.",
            "errorDetails": [
                {"level": "error", "rule": "Templates must contain valid Handlebars.", "failures": [{"ref": "index.hbs"}], "fatal": true},
                {"level": "warning", "rule": "Old helper"}
            ]
        }]}"#;

        match decode_failure(422, body) {
            ApiFailure::Validation { issues } => {
                assert_eq!(issues.len(), 2);
                assert!(issues[0].fatal);
                assert_eq!(issues[0].failures[0].reference, "index.hbs");
                assert!(issues[1].is_warning());
            }
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_with_grouped_details() {
        let body = r#"{"errors": [{
            "errorType": "ThemeValidationError",
            "message": "Invalid theme",
            "details": {"errors": [{"rule": "A"}], "warnings": [{"rule": "B"}]}
        }]}"#;

        match decode_failure(422, body) {
            ApiFailure::Validation { issues } => {
                assert_eq!(issues[0].level, IssueLevel::Error);
                assert_eq!(issues[1].level, IssueLevel::Warning);
            }
            other => panic!("Expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_other_error_type_becomes_message() {
        let body = r#"{"errors": [{"errorType": "NoPermissionError", "message": "You do not have permission."}]}"#;
        assert_eq!(
            decode_failure(403, body),
            ApiFailure::message(Some(403), "You do not have permission.")
        );
    }

    #[test]
    fn test_non_json_body_falls_back_to_status() {
        assert_eq!(
            decode_failure(502, "<html>Bad gateway</html>"),
            ApiFailure::message(Some(502), "HTTP 502 error")
        );
        assert_eq!(
            decode_failure(500, ""),
            ApiFailure::message(Some(500), "HTTP 500 error")
        );
        assert_eq!(
            decode_failure(500, "database offline"),
            ApiFailure::message(Some(500), "database offline")
        );
    }
}

//! Data models for installed themes, their templates and validation issues.
//!
//! These are the in-memory shapes the admin core works with. The JSON shapes
//! exchanged with the admin API live in [`crate::api::wire`] and are
//! converted into these types once, at the HTTP boundary.

pub mod defaults;
pub mod issue;

pub use defaults::{
    DEFAULT_TEMPLATE_FILENAME, DEFAULT_TEMPLATE_NAME, DEFAULT_THEME_ID, is_default_template,
    is_default_theme,
};
pub use issue::{IssueFailure, IssueLevel, ValidationIssue, has_blocking_issues};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Kind of document a template can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Post,
    Page,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Post => write!(f, "post"),
            DocumentKind::Page => write!(f, "page"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "post" => Ok(DocumentKind::Post),
            "page" => Ok(DocumentKind::Page),
            other => Err(format!("unknown document kind '{other}', expected post or page")),
        }
    }
}

/// Read-only reference to the document being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub slug: String,
    pub kind: DocumentKind,
}

impl DocumentRef {
    pub fn new(slug: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            slug: slug.into(),
            kind,
        }
    }

    pub fn post(slug: impl Into<String>) -> Self {
        Self::new(slug, DocumentKind::Post)
    }

    pub fn page(slug: impl Into<String>) -> Self {
        Self::new(slug, DocumentKind::Page)
    }
}

/// A custom template shipped by a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    /// Template file name; empty for the implicit default template
    pub filename: String,
    /// Display label, e.g. "News Bulletin"
    pub name: String,
    /// Document kinds allowed to use this template
    pub applies_to: BTreeSet<DocumentKind>,
    /// When set, the template is forced on the document with this slug and
    /// is never offered as a choice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug_restriction: Option<String>,
}

impl TemplateDescriptor {
    pub fn new(
        filename: impl Into<String>,
        name: impl Into<String>,
        applies_to: impl IntoIterator<Item = DocumentKind>,
    ) -> Self {
        Self {
            filename: filename.into(),
            name: name.into(),
            applies_to: applies_to.into_iter().collect(),
            slug_restriction: None,
        }
    }

    pub fn restricted_to(mut self, slug: impl Into<String>) -> Self {
        self.slug_restriction = Some(slug.into());
        self
    }

    /// The implicit template that exists for every document.
    pub fn default_template() -> Self {
        Self::new(
            DEFAULT_TEMPLATE_FILENAME,
            DEFAULT_TEMPLATE_NAME,
            [DocumentKind::Post, DocumentKind::Page],
        )
    }

    pub fn is_default(&self) -> bool {
        is_default_template(&self.filename)
    }

    pub fn applies_to(&self, kind: DocumentKind) -> bool {
        self.applies_to.contains(&kind)
    }
}

/// An installed theme package.
///
/// Only [`ThemeRegistry`](crate::registry::ThemeRegistry) mutates themes it
/// holds; everything else works on cloned snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Installed folder name; stable once installed
    pub id: String,
    /// Name from the package manifest; may collide across themes
    pub package_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub templates: Vec<TemplateDescriptor>,
    /// Warnings from the most recent upload or activation
    #[serde(default)]
    pub warnings: Vec<ValidationIssue>,
    /// Non-fatal errors from the most recent upload or activation
    #[serde(default)]
    pub errors: Vec<ValidationIssue>,
}

impl Theme {
    pub fn new(id: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            package_name: package_name.into(),
            version: None,
            active: false,
            templates: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_templates(mut self, templates: Vec<TemplateDescriptor>) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<ValidationIssue>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn activated(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn is_default(&self) -> bool {
        is_default_theme(&self.id)
    }

    /// Returns `true` when the last validation attached any issue.
    pub fn has_issues(&self) -> bool {
        !self.warnings.is_empty() || !self.errors.is_empty()
    }

    /// All attached issues, errors first.
    pub fn issues(&self) -> Vec<ValidationIssue> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect()
    }
}

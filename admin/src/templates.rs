//! Custom template selection for posts and pages.

use crate::model::{DocumentRef, TemplateDescriptor, Theme};
use std::collections::HashSet;

/// Templates available to one document under the active theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSelection {
    /// `Default` first, then the selectable templates by name
    pub options: Vec<TemplateDescriptor>,
    /// Template forced on this document by its slug; when set the selector
    /// must be disabled and this template selected
    pub locked: Option<TemplateDescriptor>,
}

impl TemplateSelection {
    /// Whether a selector is worth showing at all.
    ///
    /// Nothing to pick when the template is locked or when only the implicit
    /// default applies.
    pub fn is_selectable(&self) -> bool {
        self.locked.is_none() && self.options.len() > 1
    }
}

/// Resolves the template choices for `doc` under `active_theme`.
///
/// Callers are expected to hide the selector entirely when there is no
/// active theme; this function always needs one.
pub fn resolve_templates(doc: &DocumentRef, active_theme: &Theme) -> TemplateSelection {
    let locked = active_theme
        .templates
        .iter()
        .find(|t| {
            t.slug_restriction.as_deref() == Some(doc.slug.as_str()) && t.applies_to(doc.kind)
        })
        .cloned();

    let mut seen = HashSet::new();
    let mut custom: Vec<TemplateDescriptor> = active_theme
        .templates
        .iter()
        .filter(|t| t.applies_to(doc.kind) && t.slug_restriction.is_none() && !t.is_default())
        .filter(|t| seen.insert(t.filename.clone()))
        .cloned()
        .collect();
    custom.sort_by_key(|t| t.name.to_lowercase());

    let mut options = Vec::with_capacity(custom.len() + 1);
    options.push(TemplateDescriptor::default_template());
    options.extend(custom);

    TemplateSelection { options, locked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentKind;

    fn theme() -> Theme {
        Theme::new("casper", "Casper").activated().with_templates(vec![
            TemplateDescriptor::new(
                "custom-news-bulletin",
                "News Bulletin",
                [DocumentKind::Post, DocumentKind::Page],
            ),
            TemplateDescriptor::new("custom-big-images", "big images", [DocumentKind::Post]),
            TemplateDescriptor::new("custom-about", "About", [DocumentKind::Page]),
            TemplateDescriptor::new("post-one", "One", [DocumentKind::Post]).restricted_to("one"),
            TemplateDescriptor::new("custom-big-images", "big images", [DocumentKind::Post]),
        ])
    }

    fn names(selection: &TemplateSelection) -> Vec<&str> {
        selection.options.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_slug_restricted_template_is_locked() {
        let selection = resolve_templates(&DocumentRef::post("one"), &theme());
        assert_eq!(selection.locked.unwrap().filename, "post-one");
    }

    #[test]
    fn test_unrelated_slug_gets_sorted_deduplicated_options() {
        let selection = resolve_templates(&DocumentRef::post("unrelated"), &theme());

        assert!(selection.locked.is_none());
        assert_eq!(names(&selection), vec!["Default", "big images", "News Bulletin"]);
        assert!(selection.is_selectable());
    }

    #[test]
    fn test_kind_filters_options_and_lock() {
        let selection = resolve_templates(&DocumentRef::page("one"), &theme());

        assert!(selection.locked.is_none());
        assert_eq!(names(&selection), vec!["Default", "About", "News Bulletin"]);
    }

    #[test]
    fn test_theme_without_templates_is_not_selectable() {
        let bare = Theme::new("test-1", "Test 1").activated();
        let selection = resolve_templates(&DocumentRef::post("hello"), &bare);

        assert_eq!(selection.options.len(), 1);
        assert!(selection.options[0].is_default());
        assert!(!selection.is_selectable());
    }
}

//! Display labels for the theme listing.
//!
//! Several installed themes may share a package name (a fork installed next
//! to the original, two versions of the same theme). The listing tells them
//! apart by appending the folder name, and always marks the default theme.

use crate::model::Theme;
use crate::model::defaults::{DEFAULT_THEME_DISAMBIGUATOR, is_default_theme};
use std::collections::HashMap;

/// A theme paired with the label shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeLabel {
    pub theme: Theme,
    pub label: String,
}

/// Computes the sorted, disambiguated labels for `themes`.
///
/// A package name held by a single theme is shown as-is, with " (default)"
/// appended for the default theme. Colliding package names are all suffixed
/// with the folder name, or "default" for the default theme. The result is
/// ordered by label using plain case-sensitive string comparison.
///
/// This depends on the full theme set, so it is recomputed on every read.
pub fn resolve_labels(themes: &[Theme]) -> Vec<ThemeLabel> {
    let mut group_sizes: HashMap<&str, usize> = HashMap::new();
    for theme in themes {
        *group_sizes.entry(theme.package_name.as_str()).or_default() += 1;
    }

    let mut labels: Vec<ThemeLabel> = themes
        .iter()
        .map(|theme| {
            let collides = group_sizes
                .get(theme.package_name.as_str())
                .is_some_and(|&n| n > 1);
            ThemeLabel {
                label: label_for(theme, collides),
                theme: theme.clone(),
            }
        })
        .collect();

    labels.sort_by(|a, b| a.label.cmp(&b.label));
    labels
}

fn label_for(theme: &Theme, collides: bool) -> String {
    let default = is_default_theme(&theme.id);
    match (collides, default) {
        (_, true) => format!("{} ({DEFAULT_THEME_DISAMBIGUATOR})", theme.package_name),
        (true, false) => format!("{} ({})", theme.package_name, theme.id),
        (false, false) => theme.package_name.clone(),
    }
}

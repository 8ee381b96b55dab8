//! Structurally privileged identities.
//!
//! One theme id and one template filename get special treatment throughout
//! the admin core. Both are named here and every check goes through the
//! predicates below, so the special-casing can be audited in one place.

/// Folder name of the bundled reference theme.
///
/// This theme can never be deleted or overwritten by an upload, and it is
/// labelled "(default)" in theme listings.
pub const DEFAULT_THEME_ID: &str = "casper";

/// Label suffix used for the default theme in listings.
pub const DEFAULT_THEME_DISAMBIGUATOR: &str = "default";

/// Filename of the implicit template every document can fall back to.
pub const DEFAULT_TEMPLATE_FILENAME: &str = "";

/// Display label of the implicit template.
pub const DEFAULT_TEMPLATE_NAME: &str = "Default";

/// Returns `true` when `id` names the bundled reference theme.
pub fn is_default_theme(id: &str) -> bool {
    id == DEFAULT_THEME_ID
}

/// Returns `true` when `filename` denotes the implicit default template.
pub fn is_default_template(filename: &str) -> bool {
    filename == DEFAULT_TEMPLATE_FILENAME
}

/// Returns `true` when an archive's file stem claims the default theme's
/// identity. The comparison ignores ASCII case, so `Casper.ZIP` matches.
pub fn is_default_theme_archive_stem(stem: &str) -> bool {
    stem.eq_ignore_ascii_case(DEFAULT_THEME_ID)
}

use crate::api::ThemeArchive;
use crate::model::DocumentRef;

/// Operations accepted by [`ThemeManager`](super::ThemeManager).
#[derive(Debug, Clone)]
pub enum ThemeCommand {
    /// Installed themes, from the registry cache when it is fresh.
    ListThemes,

    /// Installed themes, always fetched from the server.
    RefreshThemes,

    /// Installed themes with their display labels, sorted by label.
    ListLabels,

    /// Template choices for a document under the active theme.
    ResolveTemplates { document: DocumentRef },

    /// Install a theme archive.
    Upload {
        archive: ThemeArchive,
        /// Replace an installed theme with the same folder name without asking
        overwrite: bool,
        /// Activate the theme once the upload succeeds
        activate: bool,
    },

    /// Make an installed theme the active one.
    Activate { id: String },

    /// Remove an installed theme.
    Delete { id: String },
}

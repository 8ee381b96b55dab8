//! Boundary with the admin API.
//!
//! The pipelines never see HTTP. They talk to a [`ThemeApi`], whose
//! implementations decode every response exactly once into either a
//! resolved value or one of the [`ApiFailure`] variants. The concrete
//! reqwest-backed implementation is [`client::HttpThemeApi`].

pub mod client;
pub mod wire;

pub use client::HttpThemeApi;

use crate::common::HttpError;
use crate::model::{Theme, ValidationIssue};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Outcome of a failed exchange with the admin API.
///
/// Server error bodies vary in shape by error type. They are decoded into
/// this closed set at the boundary so downstream logic pattern-matches
/// instead of probing JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFailure {
    /// `ThemeValidationError` body carrying structured issues
    Validation { issues: Vec<ValidationIssue> },
    /// Any other error body, reduced to its message
    Message { status: Option<u16>, text: String },
    /// The server could not be reached or did not answer in time
    Network { reason: String },
}

impl ApiFailure {
    pub fn message(status: Option<u16>, text: impl Into<String>) -> Self {
        Self::Message {
            status,
            text: text.into(),
        }
    }
}

impl From<HttpError> for ApiFailure {
    fn from(err: HttpError) -> Self {
        if err.is_connectivity() {
            ApiFailure::Network {
                reason: err.to_string(),
            }
        } else {
            ApiFailure::Message {
                status: None,
                text: err.to_string(),
            }
        }
    }
}

/// A theme package as supplied by the file picker.
#[derive(Clone, PartialEq, Eq)]
pub struct ThemeArchive {
    /// File name declared by the picker, e.g. `theme-1.zip`
    pub filename: String,
    /// Media type declared by the picker, if any
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ThemeArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeArchive")
            .field("filename", &self.filename)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ThemeArchive {
    pub fn new(filename: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.filter(|m| !m.trim().is_empty()),
            bytes,
        }
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.filename)
    }

    /// Lower-cased final extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Declared media type, or one inferred from the file name.
    pub fn effective_media_type(&self) -> String {
        match &self.media_type {
            Some(declared) => declared.clone(),
            None => mime_guess::from_path(&self.filename)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }

    /// Id the server installs this archive under.
    pub fn theme_id(&self) -> String {
        self.stem().to_lowercase()
    }

    /// SHA-256 of the archive content.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(&self.bytes).into()
    }
}

/// The admin API operations the theme core depends on.
///
/// Implementations attach whatever authentication and versioning headers the
/// deployment needs; callers never construct them.
#[async_trait]
pub trait ThemeApi: Send + Sync {
    /// `GET /themes`
    async fn list_themes(&self) -> Result<Vec<Theme>, ApiFailure>;

    /// `POST /themes/upload` with the archive as multipart form data.
    async fn upload_theme(&self, archive: &ThemeArchive) -> Result<Theme, ApiFailure>;

    /// `PUT /themes/:id/activate`
    async fn activate_theme(&self, id: &str) -> Result<Theme, ApiFailure>;

    /// `DELETE /themes/:id`
    async fn delete_theme(&self, id: &str) -> Result<(), ApiFailure>;
}

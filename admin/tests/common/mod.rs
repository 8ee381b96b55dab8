//! Shared fixtures for the admin integration tests.

#![allow(dead_code)]

use admin::api::{ApiFailure, ThemeApi, ThemeArchive};
use admin::model::{Theme, ValidationIssue};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory admin API that keeps its own installed-theme state and counts
/// every call made against it.
#[derive(Default)]
pub struct FakeThemeApi {
    pub installed: Mutex<Vec<Theme>>,

    pub list_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub activate_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,

    pub list_failure: Mutex<Option<ApiFailure>>,
    pub upload_failure: Mutex<Option<ApiFailure>>,
    pub activate_failure: Mutex<Option<ApiFailure>>,
    pub delete_failure: Mutex<Option<ApiFailure>>,

    /// Warnings attached to the next successful upload or activation
    pub warnings: Mutex<Vec<ValidationIssue>>,
}

impl FakeThemeApi {
    pub fn with_themes(themes: Vec<Theme>) -> Self {
        Self {
            installed: Mutex::new(themes),
            ..Self::default()
        }
    }

    pub fn fail_uploads(&self, failure: ApiFailure) {
        *self.upload_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_activations(&self, failure: ApiFailure) {
        *self.activate_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_deletions(&self, failure: ApiFailure) {
        *self.delete_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_listing(&self, failure: ApiFailure) {
        *self.list_failure.lock().unwrap() = Some(failure);
    }

    pub fn attach_warnings(&self, warnings: Vec<ValidationIssue>) {
        *self.warnings.lock().unwrap() = warnings;
    }

    pub fn mutation_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
            + self.activate_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn installed_ids(&self) -> Vec<String> {
        self.installed
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    fn take_warnings(&self) -> Vec<ValidationIssue> {
        std::mem::take(&mut *self.warnings.lock().unwrap())
    }
}

#[async_trait]
impl ThemeApi for FakeThemeApi {
    async fn list_themes(&self) -> Result<Vec<Theme>, ApiFailure> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.list_failure.lock().unwrap().clone() {
            return Err(failure);
        }
        Ok(self.installed.lock().unwrap().clone())
    }

    async fn upload_theme(&self, archive: &ThemeArchive) -> Result<Theme, ApiFailure> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.upload_failure.lock().unwrap().clone() {
            return Err(failure);
        }

        let id = archive.theme_id();
        let mut installed = self.installed.lock().unwrap();
        let was_active = installed.iter().any(|t| t.id == id && t.active);
        installed.retain(|t| t.id != id);

        let mut stored = Theme::new(id.clone(), id);
        stored.active = was_active;
        installed.push(stored.clone());

        // The upload response never claims the theme is active.
        stored.active = false;
        Ok(stored.with_warnings(self.take_warnings()))
    }

    async fn activate_theme(&self, id: &str) -> Result<Theme, ApiFailure> {
        self.activate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.activate_failure.lock().unwrap().clone() {
            return Err(failure);
        }

        let mut installed = self.installed.lock().unwrap();
        if !installed.iter().any(|t| t.id == id) {
            return Err(ApiFailure::message(Some(404), format!("Theme {id} not found")));
        }
        for theme in installed.iter_mut() {
            theme.active = theme.id == id;
        }
        let theme = installed
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .unwrap();
        Ok(theme.with_warnings(self.take_warnings()))
    }

    async fn delete_theme(&self, id: &str) -> Result<(), ApiFailure> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.delete_failure.lock().unwrap().clone() {
            return Err(failure);
        }
        self.installed.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }
}

/// The themes of a fresh install plus two uploaded ones.
pub fn seeded_themes() -> Vec<Theme> {
    vec![
        Theme::new("casper", "casper").activated(),
        Theme::new("test-1", "theme-test"),
        Theme::new("test-2", "theme-test"),
    ]
}

pub fn zip_archive(filename: &str, bytes: &[u8]) -> ThemeArchive {
    ThemeArchive::new(filename, Some("application/zip".to_string()), bytes.to_vec())
}

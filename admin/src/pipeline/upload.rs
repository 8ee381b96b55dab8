use super::activation::{ActivationPipeline, ActivationResult};
use super::notify_failure;
use crate::api::{ThemeApi, ThemeArchive};
use crate::config::UploadConfig;
use crate::errors::{ThemeError, ThemeResult};
use crate::model::defaults::is_default_theme_archive_stem;
use crate::model::{Theme, ValidationIssue};
use crate::notify::Notifier;
use crate::registry::ThemeRegistry;
use crate::report::{IssueReport, ReportKind};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Progress of one upload attempt.
///
/// `Idle → Validating → Uploading → {Succeeded, SucceededWithWarnings,
/// Failed}`. Terminal states return to `Idle` through
/// [`UploadPipeline::close`] or [`UploadPipeline::try_again`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Validating,
    Uploading,
    Succeeded,
    SucceededWithWarnings,
    Failed,
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::Succeeded | UploadState::SucceededWithWarnings | UploadState::Failed
        )
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadState::Idle => "idle",
            UploadState::Validating => "validating",
            UploadState::Uploading => "uploading",
            UploadState::Succeeded => "succeeded",
            UploadState::SucceededWithWarnings => "succeeded with warnings",
            UploadState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of [`UploadPipeline::upload`].
#[derive(Debug, Clone)]
pub enum UploadResult {
    Success { theme: Theme },
    SuccessWithWarnings { theme: Theme, report: IssueReport },
    Failed { error: ThemeError, report: IssueReport },
}

impl UploadResult {
    fn failed(error: ThemeError) -> Self {
        let report = IssueReport::build(ReportKind::UploadFailed, &error.issues());
        UploadResult::Failed { error, report }
    }

    pub fn theme(&self) -> Option<&Theme> {
        match self {
            UploadResult::Success { theme } | UploadResult::SuccessWithWarnings { theme, .. } => {
                Some(theme)
            }
            UploadResult::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, UploadResult::Failed { .. })
    }
}

/// Server rejection remembered for the last archive content.
struct KnownBad {
    digest: [u8; 32],
    issues: Vec<ValidationIssue>,
}

/// Validates theme archives and installs them through the admin API.
pub struct UploadPipeline {
    api: Arc<dyn ThemeApi>,
    registry: ThemeRegistry,
    notifier: Arc<dyn Notifier>,
    config: UploadConfig,
    state: Mutex<UploadState>,
    known_bad: Mutex<Option<KnownBad>>,
    uploaded: Mutex<Option<String>>,
}

impl UploadPipeline {
    pub fn new(
        api: Arc<dyn ThemeApi>,
        registry: ThemeRegistry,
        notifier: Arc<dyn Notifier>,
        config: UploadConfig,
    ) -> Self {
        Self {
            api,
            registry,
            notifier,
            config,
            state: Mutex::new(UploadState::Idle),
            known_bad: Mutex::new(None),
            uploaded: Mutex::new(None),
        }
    }

    pub async fn state(&self) -> UploadState {
        *self.state.lock().await
    }

    async fn set_state(&self, state: UploadState) {
        *self.state.lock().await = state;
    }

    /// Client-side gate. Never contacts the server.
    pub fn validate(&self, archive: &ThemeArchive) -> ThemeResult<()> {
        let media_type = archive.effective_media_type();
        let extension_ok = archive
            .extension()
            .is_some_and(|e| self.config.accepts_extension(&e));

        if !self.config.accepts_media_type(&media_type) && !extension_ok {
            return Err(ThemeError::UnsupportedMediaType {
                filename: archive.filename.clone(),
                media_type,
            });
        }

        if is_default_theme_archive_stem(archive.stem()) {
            return Err(ThemeError::DefaultThemeOverwrite {
                filename: archive.filename.clone(),
            });
        }

        Ok(())
    }

    /// Installed theme the archive would replace, if any.
    ///
    /// Fetches the installed themes when the registry is cold. A failed
    /// listing finds nothing; the upload itself then reports the failure.
    pub async fn existing_theme_for(&self, archive: &ThemeArchive) -> Option<Theme> {
        let id = archive.theme_id();
        match self.registry.list().await {
            Ok(themes) => themes.into_iter().find(|t| t.id == id),
            Err(e) => {
                log::warn!("Could not load installed themes: {e}");
                None
            }
        }
    }

    /// Runs one upload attempt from `Idle` to a terminal state.
    pub async fn upload(&self, archive: ThemeArchive) -> UploadResult {
        {
            let mut state = self.state.lock().await;
            if *state != UploadState::Idle {
                return UploadResult::failed(ThemeError::InvalidTransition {
                    state: state.to_string(),
                });
            }
            *state = UploadState::Validating;
        }

        if let Err(error) = self.validate(&archive) {
            log::warn!("Rejected {} before upload: {error}", archive.filename);
            self.set_state(UploadState::Failed).await;
            return UploadResult::failed(error);
        }

        let digest = archive.digest();
        if let Some(issues) = self.known_bad_issues(&digest).await {
            log::info!(
                "{} is unchanged since the server rejected it, not resubmitting",
                archive.filename
            );
            self.set_state(UploadState::Failed).await;
            return UploadResult::failed(ThemeError::Validation { issues });
        }

        // Prior activity must come from a real listing, not a cold cache.
        let installed = match self.registry.list().await {
            Ok(themes) => themes,
            Err(error) => {
                log::error!(
                    "Cannot list installed themes before uploading {}: {error}",
                    archive.filename
                );
                notify_failure(self.notifier.as_ref(), &error);
                self.set_state(UploadState::Failed).await;
                return UploadResult::failed(error);
            }
        };

        self.set_state(UploadState::Uploading).await;
        match self.api.upload_theme(&archive).await {
            Ok(theme) => self.complete(theme, &installed).await,
            Err(failure) => {
                let error = ThemeError::from(failure);
                log::error!("Upload of {} failed: {error}", archive.filename);

                if let ThemeError::Validation { issues } = &error {
                    *self.known_bad.lock().await = Some(KnownBad {
                        digest,
                        issues: issues.clone(),
                    });
                }
                notify_failure(self.notifier.as_ref(), &error);
                self.set_state(UploadState::Failed).await;
                UploadResult::failed(error)
            }
        }
    }

    async fn known_bad_issues(&self, digest: &[u8; 32]) -> Option<Vec<ValidationIssue>> {
        let mut known_bad = self.known_bad.lock().await;
        match known_bad.as_ref() {
            Some(bad) if &bad.digest == digest => Some(bad.issues.clone()),
            Some(_) => {
                *known_bad = None;
                None
            }
            None => None,
        }
    }

    async fn complete(&self, mut theme: Theme, installed: &[Theme]) -> UploadResult {
        // A re-upload of the active theme keeps it active; nothing else changes.
        theme.active = installed.iter().any(|t| t.id == theme.id && t.active);

        self.registry.upsert(theme.clone()).await;
        self.registry.invalidate().await;
        *self.uploaded.lock().await = Some(theme.id.clone());

        if theme.has_issues() {
            log::info!(
                "Uploaded theme {} with {} warning(s) and {} error(s)",
                theme.id,
                theme.warnings.len(),
                theme.errors.len()
            );
            self.set_state(UploadState::SucceededWithWarnings).await;
            let report =
                IssueReport::build(ReportKind::UploadSucceededWithWarnings, &theme.issues());
            UploadResult::SuccessWithWarnings { theme, report }
        } else {
            log::info!("Uploaded theme {}", theme.id);
            self.set_state(UploadState::Succeeded).await;
            UploadResult::Success { theme }
        }
    }

    /// Id of the theme installed by the last successful attempt.
    pub async fn uploaded_theme_id(&self) -> Option<String> {
        self.uploaded.lock().await.clone()
    }

    /// Leaves a terminal state without further action.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.is_terminal() {
            *state = UploadState::Idle;
            *self.uploaded.lock().await = None;
        }
    }

    /// Returns from `Failed` to `Idle` so the user can pick a file again.
    pub async fn try_again(&self) -> ThemeResult<()> {
        let mut state = self.state.lock().await;
        if *state != UploadState::Failed {
            return Err(ThemeError::InvalidTransition {
                state: state.to_string(),
            });
        }
        *state = UploadState::Idle;
        Ok(())
    }

    /// Activates the theme just uploaded, then closes the attempt.
    pub async fn activate_now(
        &self,
        activation: &ActivationPipeline,
    ) -> ThemeResult<ActivationResult> {
        let state = self.state().await;
        let id = match (state, self.uploaded_theme_id().await) {
            (UploadState::Succeeded | UploadState::SucceededWithWarnings, Some(id)) => id,
            _ => {
                return Err(ThemeError::InvalidTransition {
                    state: state.to_string(),
                });
            }
        };

        let result = activation.activate(&id).await;
        self.close().await;
        Ok(result)
    }
}

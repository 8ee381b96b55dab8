use super::notify_failure;
use crate::api::ThemeApi;
use crate::errors::ThemeError;
use crate::model::Theme;
use crate::notify::Notifier;
use crate::registry::ThemeRegistry;
use crate::report::{IssueReport, ReportKind};
use std::sync::Arc;

/// Outcome of [`ActivationPipeline::activate`].
#[derive(Debug, Clone)]
pub enum ActivationResult {
    Success { theme: Theme },
    SuccessWithWarnings { theme: Theme, report: IssueReport },
    Failed { error: ThemeError, report: IssueReport },
}

impl ActivationResult {
    pub fn theme(&self) -> Option<&Theme> {
        match self {
            ActivationResult::Success { theme }
            | ActivationResult::SuccessWithWarnings { theme, .. } => Some(theme),
            ActivationResult::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ActivationResult::Failed { .. })
    }
}

/// Makes an installed theme the active one.
pub struct ActivationPipeline {
    api: Arc<dyn ThemeApi>,
    registry: ThemeRegistry,
    notifier: Arc<dyn Notifier>,
}

impl ActivationPipeline {
    pub fn new(api: Arc<dyn ThemeApi>, registry: ThemeRegistry, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            registry,
            notifier,
        }
    }

    /// Activates `id` on the server, then mirrors the change locally.
    ///
    /// Re-activating the active theme still performs the round trip. On
    /// failure the registry is left exactly as it was.
    pub async fn activate(&self, id: &str) -> ActivationResult {
        match self.api.activate_theme(id).await {
            Ok(theme) => {
                // The returned record carries the warnings; the active flag is ours to set.
                let theme = theme.activated();
                self.registry.upsert(theme.clone()).await;
                self.registry.invalidate().await;

                if theme.has_issues() {
                    log::info!("Activated theme {} with warnings", theme.id);
                    let report = IssueReport::build(
                        ReportKind::ActivationSucceededWithWarnings,
                        &theme.issues(),
                    );
                    ActivationResult::SuccessWithWarnings { theme, report }
                } else {
                    log::info!("Activated theme {}", theme.id);
                    ActivationResult::Success { theme }
                }
            }
            Err(failure) => {
                let error = ThemeError::from(failure);
                log::error!("Activation of {id} failed: {error}");
                notify_failure(self.notifier.as_ref(), &error);

                let report = IssueReport::build(ReportKind::ActivationFailed, &error.issues());
                ActivationResult::Failed { error, report }
            }
        }
    }
}

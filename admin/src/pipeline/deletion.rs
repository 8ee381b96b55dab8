use super::notify_failure;
use crate::api::ThemeApi;
use crate::errors::{ProtectionReason, ThemeError, ThemeResult};
use crate::model::defaults::is_default_theme;
use crate::notify::Notifier;
use crate::registry::ThemeRegistry;
use std::sync::Arc;

/// Outcome of [`DeletionPipeline::remove`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeletionResult {
    Deleted { id: String },
    Failed { error: ThemeError },
}

impl DeletionResult {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeletionResult::Deleted { .. })
    }
}

/// Removes installed themes, refusing the default and the active one.
pub struct DeletionPipeline {
    api: Arc<dyn ThemeApi>,
    registry: ThemeRegistry,
    notifier: Arc<dyn Notifier>,
}

impl DeletionPipeline {
    pub fn new(api: Arc<dyn ThemeApi>, registry: ThemeRegistry, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            registry,
            notifier,
        }
    }

    /// Whether the listing should offer deletion for `id`.
    ///
    /// The active theme is read through [`ThemeRegistry::list`], so a cold or
    /// stale registry is fetched first. When the installed themes cannot be
    /// listed the listing error is returned and deletion must not proceed.
    pub async fn can_delete(&self, id: &str) -> ThemeResult<()> {
        if is_default_theme(id) {
            return Err(ThemeError::protected(id, ProtectionReason::DefaultTheme));
        }
        let themes = self.registry.list().await?;
        if themes.iter().any(|t| t.active && t.id == id) {
            return Err(ThemeError::protected(id, ProtectionReason::ActiveTheme));
        }
        Ok(())
    }

    /// Deletes `id` on the server and drops it from the registry.
    ///
    /// Protected themes are refused without contacting the delete endpoint,
    /// and so is every theme when the active one cannot be determined.
    pub async fn remove(&self, id: &str) -> DeletionResult {
        if let Err(error) = self.can_delete(id).await {
            let error = flatten(error);
            if error.is_local() {
                log::warn!("Refusing to delete theme {id}: {error}");
            } else {
                log::error!("Cannot check whether theme {id} is active: {error}");
                notify_failure(self.notifier.as_ref(), &error);
            }
            return DeletionResult::Failed { error };
        }

        match self.api.delete_theme(id).await {
            Ok(()) => {
                if let Err(e) = self.registry.remove(id).await {
                    log::debug!("Deleted theme {id} was not cached: {e}");
                }
                self.registry.invalidate().await;
                log::info!("Deleted theme {id}");
                DeletionResult::Deleted { id: id.to_string() }
            }
            Err(failure) => {
                let error = flatten(ThemeError::from(failure));
                log::error!("Deletion of {id} failed: {error}");
                notify_failure(self.notifier.as_ref(), &error);
                DeletionResult::Failed { error }
            }
        }
    }
}

/// Deletion failures are always shown as one message.
fn flatten(error: ThemeError) -> ThemeError {
    match error {
        ThemeError::Validation { issues } => ThemeError::Remote {
            status: None,
            message: issues
                .first()
                .map(|i| i.rule.clone())
                .unwrap_or_else(|| "Theme could not be deleted".to_string()),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValidationIssue;

    #[test]
    fn test_flatten_turns_validation_into_message() {
        let error = flatten(ThemeError::Validation {
            issues: vec![ValidationIssue::error("Theme is in use")],
        });
        assert!(error.is_single_message());
        assert!(error.to_string().contains("Theme is in use"));
    }

    #[test]
    fn test_flatten_keeps_network_errors() {
        let error = flatten(ThemeError::Network {
            reason: "timed out".into(),
        });
        assert!(matches!(error, ThemeError::Network { .. }));
    }
}

use super::commands::ThemeCommand;
use super::responses::ThemeResponse;
use crate::api::{HttpThemeApi, ThemeApi, ThemeArchive};
use crate::common::HttpError;
use crate::config::{AdminApiConfig, UploadConfig};
use crate::errors::ThemeResult;
use crate::labels::resolve_labels;
use crate::model::DocumentRef;
use crate::notify::Notifier;
use crate::pipeline::{ActivationPipeline, DeletionPipeline, UploadPipeline, UploadResult};
use crate::registry::ThemeRegistry;
use crate::templates::resolve_templates;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Coordinates the theme registry and the lifecycle pipelines.
///
/// Every component shares one [`ThemeRegistry`], so a mutation made by any
/// pipeline is visible to the next listing. The manager is safe to share
/// across tasks.
pub struct ThemeManager {
    registry: ThemeRegistry,
    upload: UploadPipeline,
    activation: ActivationPipeline,
    deletion: DeletionPipeline,

    // Error tracking
    last_error: Arc<Mutex<Option<String>>>,
}

impl ThemeManager {
    pub fn new(
        api: Arc<dyn ThemeApi>,
        notifier: Arc<dyn Notifier>,
        upload_config: UploadConfig,
    ) -> Self {
        let registry = ThemeRegistry::new(api.clone());

        Self {
            upload: UploadPipeline::new(
                api.clone(),
                registry.clone(),
                notifier.clone(),
                upload_config,
            ),
            activation: ActivationPipeline::new(api.clone(), registry.clone(), notifier.clone()),
            deletion: DeletionPipeline::new(api, registry.clone(), notifier),
            registry,
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Builds a manager talking to the admin API over HTTP.
    pub fn connect(
        api_config: AdminApiConfig,
        upload_config: UploadConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, HttpError> {
        let api = HttpThemeApi::new(api_config)?;
        Ok(Self::new(Arc::new(api), notifier, upload_config))
    }

    /// Executes a command and returns its response.
    ///
    /// Failures never escape as `Err`; they are carried by the response and
    /// remembered as the last error.
    pub async fn execute_command(&self, command: ThemeCommand) -> ThemeResponse {
        log::debug!("Executing command: {command:?}");

        let response = match self.handle_command(command).await {
            Ok(response) => response,
            Err(error) => ThemeResponse::Error { error },
        };

        let mut last_error = self.last_error.lock().await;
        match response.error() {
            Some(error) => {
                log::error!("Command execution failed: {error}");
                *last_error = Some(error.to_string());
            }
            None => *last_error = None,
        }
        response
    }

    async fn handle_command(&self, command: ThemeCommand) -> ThemeResult<ThemeResponse> {
        match command {
            ThemeCommand::ListThemes => Ok(ThemeResponse::Themes {
                themes: self.registry.list().await?,
            }),
            ThemeCommand::RefreshThemes => Ok(ThemeResponse::Themes {
                themes: self.registry.refresh().await?,
            }),
            ThemeCommand::ListLabels => {
                let themes = self.registry.list().await?;
                Ok(ThemeResponse::Labels {
                    labels: resolve_labels(&themes),
                })
            }
            ThemeCommand::ResolveTemplates { document } => {
                self.handle_resolve_templates(document).await
            }
            ThemeCommand::Upload {
                archive,
                overwrite,
                activate,
            } => Ok(self.handle_upload(archive, overwrite, activate).await),
            ThemeCommand::Activate { id } => Ok(ThemeResponse::Activated {
                result: self.activation.activate(&id).await,
            }),
            ThemeCommand::Delete { id } => Ok(ThemeResponse::Deleted {
                result: self.deletion.remove(&id).await,
            }),
        }
    }

    async fn handle_resolve_templates(&self, document: DocumentRef) -> ThemeResult<ThemeResponse> {
        let themes = self.registry.list().await?;
        let selection = themes
            .iter()
            .find(|t| t.active)
            .map(|active| resolve_templates(&document, active));
        Ok(ThemeResponse::Templates { selection })
    }

    async fn handle_upload(
        &self,
        archive: ThemeArchive,
        overwrite: bool,
        activate: bool,
    ) -> ThemeResponse {
        if !overwrite {
            if let Some(existing) = self.upload.existing_theme_for(&archive).await {
                log::info!(
                    "{} would replace installed theme {}, asking for confirmation",
                    archive.filename,
                    existing.id
                );
                return ThemeResponse::OverwriteConfirmationRequired { existing };
            }
        }

        let result = self.upload.upload(archive).await;
        let activation = match (&result, activate) {
            (UploadResult::Success { .. } | UploadResult::SuccessWithWarnings { .. }, true) => {
                match self.upload.activate_now(&self.activation).await {
                    Ok(activation) => Some(activation),
                    Err(e) => {
                        log::warn!("Could not activate uploaded theme: {e}");
                        None
                    }
                }
            }
            _ => None,
        };
        self.upload.close().await;

        ThemeResponse::Uploaded { result, activation }
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn upload_pipeline(&self) -> &UploadPipeline {
        &self.upload
    }

    pub fn activation_pipeline(&self) -> &ActivationPipeline {
        &self.activation
    }

    pub fn deletion_pipeline(&self) -> &DeletionPipeline {
        &self.deletion
    }

    pub async fn get_last_error(&self) -> Option<String> {
        let last_error = self.last_error.lock().await;
        last_error.clone()
    }
}

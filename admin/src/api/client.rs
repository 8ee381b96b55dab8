use super::wire::{decode_failure, decode_single_theme, decode_theme_list};
use super::{ApiFailure, ThemeApi, ThemeArchive};
use crate::common::HttpError;
use crate::config::AdminApiConfig;
use crate::model::Theme;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};

/// Field name the upload endpoint expects the archive under.
const UPLOAD_FIELD: &str = "file";

/// reqwest-backed [`ThemeApi`] talking to the admin API.
///
/// Authentication and versioning headers from [`AdminApiConfig`] are set
/// once as client defaults, so individual requests never build them.
pub struct HttpThemeApi {
    http_client: reqwest::Client,
    config: AdminApiConfig,
}

impl HttpThemeApi {
    /// Create a new client from configuration
    pub fn new(config: AdminApiConfig) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(version) = &config.accept_version {
            headers.insert(
                HeaderName::from_static("accept-version"),
                header_value(version)?,
            );
        }
        if let Some(token) = &config.auth_token {
            headers.insert(AUTHORIZATION, header_value(token)?);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| HttpError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(http_client: reqwest::Client, config: AdminApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn theme_url(&self, id: &str, suffix: &str) -> String {
        let encoded = urlencoding::encode(id);
        self.config.endpoint(&format!("themes/{encoded}{suffix}"))
    }

    /// Sends the request and returns the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<String, ApiFailure> {
        let response = request
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(e, url, self.config.timeout_secs))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| HttpError::InvalidResponse {
            expected: "readable response body".to_string(),
            actual: e.to_string(),
        })?;

        if status.is_success() {
            log::debug!("{url} answered {status}");
            Ok(body)
        } else {
            log::debug!("{url} failed with {status}: {body}");
            Err(decode_failure(status.as_u16(), &body))
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(value).map_err(|e| HttpError::ClientCreation {
        reason: format!("invalid header value: {e}"),
    })
}

#[async_trait]
impl ThemeApi for HttpThemeApi {
    async fn list_themes(&self) -> Result<Vec<Theme>, ApiFailure> {
        let url = self.config.endpoint("themes");
        log::debug!("Fetching installed themes from {url}");

        let body = self.send(self.http_client.get(&url), &url).await?;
        Ok(decode_theme_list(&body)?)
    }

    async fn upload_theme(&self, archive: &ThemeArchive) -> Result<Theme, ApiFailure> {
        let url = self.config.endpoint("themes/upload");
        log::debug!(
            "Uploading {} ({} bytes) to {url}",
            archive.filename,
            archive.bytes.len()
        );

        let part = Part::bytes(archive.bytes.clone())
            .file_name(archive.filename.clone())
            .mime_str(&archive.effective_media_type())
            .map_err(|e| HttpError::ClientCreation {
                reason: format!("invalid media type: {e}"),
            })?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let body = self
            .send(self.http_client.post(&url).multipart(form), &url)
            .await?;
        Ok(decode_single_theme(&body)?)
    }

    async fn activate_theme(&self, id: &str) -> Result<Theme, ApiFailure> {
        let url = self.theme_url(id, "/activate");
        log::debug!("Activating theme {id} via {url}");

        let body = self.send(self.http_client.put(&url), &url).await?;
        Ok(decode_single_theme(&body)?)
    }

    async fn delete_theme(&self, id: &str) -> Result<(), ApiFailure> {
        let url = self.theme_url(id, "");
        log::debug!("Deleting theme {id} via {url}");

        self.send(self.http_client.delete(&url), &url).await?;
        Ok(())
    }
}

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub mod app;
pub mod validation;

pub use app::AppConfig;
pub use validation::{ConfigLoadResult, ConfigValidationError};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variables override file values, e.g.
/// `THEMEKEEPER_API__BASE_URL`.
pub const ENV_PREFIX: &str = "THEMEKEEPER";

/// `./config.toml` when present, otherwise the per-user config file.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("themekeeper").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads `.env`, then the config file, then environment overrides.
pub fn load_config(explicit: Option<&Path>) -> ConfigLoadResult {
    dotenv::dotenv().ok();
    let path = explicit.map(Path::to_path_buf).or_else(default_config_path);
    load_from(path.as_deref(), ENV_PREFIX)
}

pub fn load_from(path: Option<&Path>, env_prefix: &str) -> ConfigLoadResult {
    let mut builder = Config::builder();
    if let Some(path) = path {
        log::debug!("Reading configuration from {}", path.display());
        builder = builder.add_source(File::from(path).required(true));
    }
    let env_source = Environment::with_prefix(env_prefix)
        .prefix_separator("_")
        .separator("__");

    let config = match builder.add_source(env_source).build() {
        Ok(config) => config,
        Err(e) => {
            return ConfigLoadResult::LoadError(format!(
                "Configuration loading failed: {e}. Please check your config.toml file and environment variables."
            ));
        }
    };

    match config.try_deserialize::<AppConfig>() {
        Ok(app_config) => {
            if let Err(validation_errors) = app_config.validate() {
                let error_messages: Vec<String> =
                    validation_errors.iter().map(|e| e.user_message()).collect();
                return ConfigLoadResult::DeserializeError(format!(
                    "Configuration validation failed:\n{}",
                    error_messages.join("\n\n")
                ));
            }
            ConfigLoadResult::Success(Box::new(app_config))
        }
        Err(e) => ConfigLoadResult::DeserializeError(format!("Failed to deserialize config: {e}")),
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn new(level: Option<String>, file: Option<String>) -> Self {
        Self { level, file }
    }

    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

use admin::api::ThemeArchive;
use admin::model::{DocumentKind, DocumentRef};
use admin::theme_manager::{ThemeCommand, ThemeManager, ThemeResponse};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use themekeeper::config::{self, ConfigLoadResult};
use themekeeper::logger;
use themekeeper::output::{self, TerminalNotifier};

/// Manage the themes installed on a CMS through its admin API.
#[derive(Debug, Parser)]
#[command(name = "themekeeper", version)]
struct Cli {
    /// Path to a config.toml (default: ./config.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the installed theme records, one per line.
    List {
        /// Fetch from the server even when the listing is cached
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    /// List installed themes by display label, marking the active one.
    Labels,
    /// Show the templates available to a post or page under the active theme.
    Templates {
        #[arg(long)]
        slug: String,
        #[arg(long, default_value = "post")]
        kind: DocumentKind,
    },
    /// Upload a theme archive.
    Upload {
        file: PathBuf,
        /// Media type to declare instead of guessing from the file name
        #[arg(long)]
        media_type: Option<String>,
        /// Replace an installed theme with the same name
        #[arg(long, default_value_t = false)]
        overwrite: bool,
        /// Activate the theme after a successful upload
        #[arg(long, default_value_t = false)]
        activate: bool,
    },
    /// Activate an installed theme.
    Activate { id: String },
    /// Delete an installed theme.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the command ran but the operation failed.
async fn run(cli: Cli) -> Result<bool> {
    let app_config = match config::load_config(cli.config.as_deref()) {
        ConfigLoadResult::Success(config) => config,
        ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => bail!(e),
    };
    logger::setup_logger(app_config.logging(), cli.verbose)
        .context("Failed to initialize logging")?;

    let manager = ThemeManager::connect(
        app_config.api().clone(),
        app_config.upload().clone(),
        Arc::new(TerminalNotifier),
    )
    .context("Failed to create admin API client")?;

    let command = match cli.command {
        Command::List { refresh: false } => ThemeCommand::ListThemes,
        Command::List { refresh: true } => ThemeCommand::RefreshThemes,
        Command::Labels => ThemeCommand::ListLabels,
        Command::Templates { slug, kind } => ThemeCommand::ResolveTemplates {
            document: DocumentRef::new(slug, kind),
        },
        Command::Upload {
            file,
            media_type,
            overwrite,
            activate,
        } => ThemeCommand::Upload {
            archive: read_archive(&file, media_type)?,
            overwrite,
            activate,
        },
        Command::Activate { id } => ThemeCommand::Activate { id },
        Command::Delete { id } => ThemeCommand::Delete { id },
    };

    let response = manager.execute_command(command).await;
    print_response(&response);
    let needs_confirmation = matches!(
        response,
        ThemeResponse::OverwriteConfirmationRequired { .. }
    );
    Ok(!response.is_error() && !needs_confirmation)
}

fn read_archive(file: &Path, media_type: Option<String>) -> Result<ThemeArchive> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", file.display()))?;
    Ok(ThemeArchive::new(filename, media_type, bytes))
}

fn print_response(response: &ThemeResponse) {
    match response {
        ThemeResponse::Themes { themes } => print!("{}", output::render_themes(themes)),
        ThemeResponse::Labels { labels } => print!("{}", output::render_labels(labels)),
        ThemeResponse::Templates { selection } => {
            print!("{}", output::render_templates(selection.as_ref()))
        }
        ThemeResponse::OverwriteConfirmationRequired { existing } => {
            eprintln!(
                "A theme named '{}' is already installed. Re-run with --overwrite to replace it.",
                existing.id
            );
        }
        ThemeResponse::Uploaded { result, activation } => {
            print!("{}", output::render_upload(result));
            if let Some(activation) = activation {
                print!("{}", output::render_activation(activation));
            }
        }
        ThemeResponse::Activated { result } => print!("{}", output::render_activation(result)),
        ThemeResponse::Deleted { result } => print!("{}", output::render_deletion(result)),
        ThemeResponse::Error { error } => eprintln!("error: {error}"),
    }
}

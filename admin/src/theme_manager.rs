//! # Theme Manager Module
//!
//! Single entry point for hosts that drive the theme lifecycle: the listing,
//! the label and template resolvers and the three mutating pipelines behind
//! one command/response interface.
//!
//! ## Usage
//!
//! ```no_run
//! use admin::theme_manager::{ThemeCommand, ThemeManager, ThemeResponse};
//!
//! async fn example(manager: ThemeManager) {
//!     match manager.execute_command(ThemeCommand::ListLabels).await {
//!         ThemeResponse::Labels { labels } => {
//!             for entry in labels {
//!                 println!("{}", entry.label);
//!             }
//!         }
//!         ThemeResponse::Error { error } => eprintln!("{error}"),
//!         _ => {}
//!     }
//! }
//! ```

pub mod commands;
pub mod manager;
pub mod responses;

pub use commands::ThemeCommand;
pub use manager::ThemeManager;
pub use responses::ThemeResponse;

//! # Themekeeper Admin Library
//!
//! Client-side lifecycle management for the themes installed in a CMS: the
//! cached listing, display labels, custom template selection and the upload,
//! activation and deletion pipelines that talk to the admin API.
//!
//! ## Modules
//!
//! - [`api`] - Admin API trait, HTTP client and wire format
//! - [`model`] - Themes, templates and validation issues
//! - [`registry`] - Session-wide cache of installed themes
//! - [`labels`] - Display labels for the theme listing
//! - [`templates`] - Template choices for posts and pages
//! - [`pipeline`] - Upload, activation and deletion
//! - [`report`] - Shared rendering of validation outcomes
//! - [`notify`] - Alert sink for single-message failures
//! - [`theme_manager`] - Command/response facade over everything above
//! - [`config`] - Admin API and upload settings
//! - [`errors`] / [`common`] - Error types

pub mod api;
pub mod common;
pub mod config;
pub mod errors;
pub mod labels;
pub mod model;
pub mod notify;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod templates;
pub mod theme_manager;

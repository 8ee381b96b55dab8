//! # Themekeeper CLI Library
//!
//! Configuration loading, logging setup and terminal rendering for the
//! `themekeeper` command. Exposed as a library so the pieces can be tested
//! without running the binary.
//!
//! ## Modules
//!
//! - [`config`] - `config.toml`, `.env` and environment variable loading
//! - [`logger`] - fern-based logger setup
//! - [`output`] - Plain-text rendering of command results

pub mod config;
pub mod logger;
pub mod output;

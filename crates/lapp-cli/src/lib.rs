//! lapp CLI - post-build helper for lapp apps.
//!
//! Runs the same post-processing as the `lapp-plugin` rolldown plugin, for
//! projects whose bundler cannot load Rust plugins or when the metadata
//! needs refreshing without a full rebuild.
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions
//! - [`commands`] - `post-build` and `check`
//! - [`error`] - error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines
//! - [`watcher`] - debounced metadata watcher for `--watch`

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;
pub mod watcher;

pub use error::{CliError, Result};

//! Command implementations for the lapp CLI.
//!
//! - [`post_build`] - Write the strict metadata, optionally keep watching
//! - [`check`] - Validate the project without writing
//!
//! Both commands resolve their options the same way: defaults, then
//! `lapp.config.json`, then `LAPP_*` variables, then command-line flags.

pub mod check;
pub mod post_build;

pub use check::execute as check_execute;
pub use post_build::execute as post_build_execute;

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};
use crate::ui;
use figment::Figment;
use lapp_plugin::LappPluginOptions;

/// Layered options for the project selected by `args`
pub(crate) fn project_figment(args: &ProjectArgs) -> Result<Figment> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::FileNotFound(root));
    }
    if let Some(config) = &args.config {
        if !config.is_file() {
            return Err(CliError::FileNotFound(config.clone()));
        }
    }

    let mut figment =
        LappPluginOptions::figment(&root, args.config.as_deref()).merge(("root", &root));

    if let Some(dir) = &args.out_dir {
        figment = figment.merge(("buildDir", dir));
    }
    if let Some(meta) = &args.meta {
        figment = figment.merge(("metaFile", meta));
    }
    if let Some(manifest) = &args.manifest {
        figment = figment.merge(("manifest", manifest));
    }
    if let Some(escape) = args.placeholder_escape {
        figment = figment.merge(("placeholderEscape", escape));
    }
    if !ui::colors_enabled() {
        figment = figment.merge(("color", false));
    }

    Ok(figment)
}

//! Command-line interface definition for the lapp CLI.
//!
//! # Command Structure
//!
//! - `lapp post-build` - Write the strict lapp-meta.json (optionally keep watching)
//! - `lapp check` - Validate package.json and lapp-meta.json without writing

use clap::{Args, Parser, Subcommand, ValueEnum};
use lapp_plugin::PlaceholderEscape;
use serde::Serialize;
use std::path::PathBuf;

/// lapp - post-build helper for lapp apps
#[derive(Parser, Debug)]
#[command(
    name = "lapp",
    version,
    about = "Post-build helper for lapp apps",
    long_about = "Copies the comment-tolerant lapp-meta.json into the build output as\n\
                  strict JSON. In watch mode it also prints the whistle proxy rule and\n\
                  the development URL once, on the first build."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write <build>/lapp-meta.json and, with --watch, keep it in sync
    PostBuild(PostBuildArgs),

    /// Validate the manifest and metadata without writing anything
    Check(CheckArgs),
}

/// Paths and options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Options file (defaults to <root>/lapp.config.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build output directory, relative to the root
    #[arg(short, long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Metadata source file, relative to the root
    #[arg(long, value_name = "FILE")]
    pub meta: Option<PathBuf>,

    /// Manifest file, relative to the root
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// How to escape the capture placeholder in the proxy rule
    #[arg(long, value_enum, value_name = "MODE")]
    pub placeholder_escape: Option<EscapeArg>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PostBuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print the development setup and rewrite the metadata on every change
    #[arg(short, long)]
    pub watch: bool,

    /// Open the development URL in a browser after the first build
    #[arg(long)]
    pub open: bool,

    /// Debounce window for file changes in milliseconds
    #[arg(long, default_value_t = 100, value_name = "MS")]
    pub debounce: u64,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Placeholder escaping on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeArg {
    /// Escape only on back-slash filesystems
    Auto,
    /// Always escape
    Always,
    /// Never escape
    Never,
}

impl From<EscapeArg> for PlaceholderEscape {
    fn from(arg: EscapeArg) -> Self {
        match arg {
            EscapeArg::Auto => PlaceholderEscape::Auto,
            EscapeArg::Always => PlaceholderEscape::Always,
            EscapeArg::Never => PlaceholderEscape::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_build_defaults() {
        let cli = Cli::try_parse_from(["lapp", "post-build"]).unwrap();
        let Command::PostBuild(args) = cli.command else {
            panic!("expected post-build");
        };
        assert!(!args.watch);
        assert!(!args.open);
        assert_eq!(args.debounce, 100);
        assert!(args.project.out_dir.is_none());
    }

    #[test]
    fn test_parse_post_build_watch() {
        let cli = Cli::try_parse_from([
            "lapp",
            "post-build",
            "--watch",
            "--out-dir",
            "dist",
            "--placeholder-escape",
            "always",
        ])
        .unwrap();
        let Command::PostBuild(args) = cli.command else {
            panic!("expected post-build");
        };
        assert!(args.watch);
        assert_eq!(args.project.out_dir, Some(PathBuf::from("dist")));
        assert_eq!(args.project.placeholder_escape, Some(EscapeArg::Always));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["lapp", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lapp", "check", "--no-color", "--verbose"]).unwrap();
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn test_escape_values() {
        let names: Vec<_> = EscapeArg::value_variants()
            .iter()
            .map(|v| v.to_possible_value().unwrap().get_name().to_string())
            .collect();
        assert_eq!(names, vec!["auto", "always", "never"]);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

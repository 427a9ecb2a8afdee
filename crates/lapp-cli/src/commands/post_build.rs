//! `lapp post-build` - write the strict lapp-meta.json.
//!
//! Without `--watch` this runs the post-processor once and exits. With
//! `--watch` the first run prints the development setup, then every change
//! to the metadata file rewrites the build copy until Ctrl-C.

use crate::cli::PostBuildArgs;
use crate::commands::project_figment;
use crate::error::Result;
use crate::ui;
use crate::watcher::FileWatcher;
use lapp_plugin::{LappPluginOptions, PostBuildReport, PostProcessor};
use std::time::Instant;

/// Execute the post-build command.
///
/// # Errors
///
/// Returns errors for an invalid manifest (before any file is touched), a
/// missing or unparsable metadata file, and an unwritable build directory.
/// In watch mode the same errors end the session.
pub async fn execute(args: PostBuildArgs) -> Result<()> {
    let mut figment = project_figment(&args.project)?.merge(("watch", args.watch));
    if args.open {
        figment = figment.merge(("openBrowser", true));
    }
    let options: LappPluginOptions = figment.extract()?;

    let processor = PostProcessor::new(options)?;
    run_once(&processor)?;

    if args.watch {
        watch(&processor, args.debounce).await?;
    }
    Ok(())
}

/// One build-completion event
fn run_once(processor: &PostProcessor) -> Result<PostBuildReport> {
    let start = Instant::now();
    let report = processor.on_build_complete()?;
    ui::success(&format!(
        "Wrote {} in {:.1?}",
        report.meta_output.display(),
        start.elapsed()
    ));
    Ok(report)
}

async fn watch(processor: &PostProcessor, debounce_ms: u64) -> Result<()> {
    let (watcher, mut changes) = FileWatcher::new(processor.options().meta_path(), debounce_ms)?;
    ui::info(&format!(
        "Watching {} for changes (Ctrl-C to stop)",
        watcher.target().display()
    ));

    loop {
        tokio::select! {
            change = changes.next() => {
                if change.is_none() {
                    break;
                }
                tracing::debug!("metadata changed, rebuilding");
                run_once(processor)?;
            }
            _ = tokio::signal::ctrl_c() => {
                ui::info("Stopped watching");
                break;
            }
        }
    }

    Ok(())
}

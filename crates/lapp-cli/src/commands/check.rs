//! `lapp check` - validate a lapp project without writing anything.

use crate::cli::CheckArgs;
use crate::commands::project_figment;
use crate::error::Result;
use crate::ui;
use lapp_plugin::{AppIdentity, LappPluginOptions, MetaDocument, PostProcessor};

/// Execute the check command.
///
/// Validates the manifest identity, parses the metadata file and prints the
/// development setup that `post-build --watch` would show.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let options: LappPluginOptions = project_figment(&args.project)?
        .merge(("watch", false))
        .extract()?;

    let identity = AppIdentity::load(&options.manifest_path())?;
    ui::success(&format!(
        "{}: appKey={} version={} platform={}",
        options.manifest.display(),
        identity.app_key,
        identity.version,
        identity.platform
    ));

    let document = MetaDocument::read(&options.meta_path())?;
    ui::success(&format!("{} parses", options.meta_file.display()));
    tracing::debug!("metadata:\n{}", document.to_pretty_string());

    let processor = PostProcessor::with_identity(identity, options);
    let env = processor.dev_environment()?;
    println!("Proxy rule: {}", env.proxy_rule);
    println!("Dev URL:    {}", env.dev_url);

    Ok(())
}

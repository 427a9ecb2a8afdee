//! Rolldown plugin for lapp apps
//!
//! After every bundle this plugin copies the hand-written, comment-tolerant
//! `lapp-meta.json` into the build output as strict JSON. When the bundler
//! runs with `--watch`, the first finished build also prints the local
//! development setup: a whistle proxy rule pointing the CDN copy of the app
//! at the build directory, and the URL of the development page.
//!
//! ## Architecture
//!
//! ```text
//! package.json ──► AppIdentity (validated once, at construction)
//!
//! generate_bundle ──► PostProcessor::on_build_complete
//!                        ├─ MetaDocument::read     (lapp-meta.json, comments allowed)
//!                        ├─ MetaDocument::write_into (<build>/lapp-meta.json)
//!                        └─ first watch build only: DevEnvironment + Banner
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use lapp_plugin::{LappPlugin, LappPluginOptions};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LappPluginOptions::new().with_build_dir("dist");
//! let plugin = Arc::new(LappPlugin::with_options(options)?);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::Context;
use rolldown_plugin::{HookGenerateBundleArgs, HookNoopReturn, HookUsage, Plugin, PluginContext};

pub mod banner;
pub mod browser;
pub mod config;
pub mod error;
pub mod manifest;
pub mod meta;
pub mod processor;
pub mod proxy;

pub use banner::Banner;
pub use browser::{BrowserOpener, SystemBrowser};
pub use config::{CONFIG_FILE_NAME, LappPluginOptions};
pub use error::{LappError, Result};
pub use manifest::{AppIdentity, Platform};
pub use meta::{META_FILE_NAME, MetaDocument};
pub use processor::{PostBuildReport, PostProcessor, WATCH_FLAG, is_watch_mode};
pub use proxy::{CdnPaths, DevEnvironment, PathStyle, PlaceholderEscape};

/// Rolldown plugin that post-processes lapp builds
///
/// The plugin owns a single [`PostProcessor`], so the "print once" state
/// survives across rebuilds for as long as the plugin instance lives.
#[derive(Debug, Clone)]
pub struct LappPlugin {
    processor: Arc<PostProcessor>,
}

impl LappPlugin {
    /// Create a plugin for the project in the current directory
    ///
    /// Options come from `lapp.config.json` and `LAPP_*` variables when
    /// present. Fails if package.json lacks a valid identity.
    pub fn new() -> Result<Self> {
        let root = std::env::current_dir()?;
        Self::with_options(LappPluginOptions::load(&root)?)
    }

    /// Create a plugin with explicit options
    ///
    /// # Errors
    ///
    /// Returns a manifest error when package.json is missing, unreadable or
    /// lacks a valid identity
    pub fn with_options(options: LappPluginOptions) -> Result<Self> {
        Ok(Self::from_processor(PostProcessor::new(options)?))
    }

    /// Wrap a configured processor, e.g. one with a custom browser opener
    pub fn from_processor(processor: PostProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    /// The shared post-processor
    pub fn processor(&self) -> &PostProcessor {
        &self.processor
    }
}

impl Plugin for LappPlugin {
    fn name(&self) -> Cow<'static, str> {
        "lapp".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::GenerateBundle
    }

    /// Runs the post-processor once the bundle is generated
    ///
    /// Any failure aborts the build.
    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        _args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let processor = Arc::clone(&self.processor);

        async move {
            let report = processor
                .on_build_complete()
                .context("lapp post-build failed")?;
            tracing::debug!(
                announced = report.announced.is_some(),
                "[lapp] post-processed {}",
                report.meta_output.display()
            );
            Ok(())
        }
    }
}

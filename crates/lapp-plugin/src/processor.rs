//! Build-completion post-processor
//!
//! Runs once per finished bundle:
//!
//! ```text
//! lapp-meta.json → parse (comments allowed) → <build>/lapp-meta.json
//!                                           ↓ (watch mode, first build only)
//!                                   Environment Info banner [+ browser]
//! ```
//!
//! The only state carried between builds is the one-shot `announced` flag.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use path_clean::PathClean;

use crate::banner::{Banner, should_use_color};
use crate::browser::{BrowserOpener, SystemBrowser};
use crate::config::LappPluginOptions;
use crate::error::Result;
use crate::manifest::AppIdentity;
use crate::meta::{META_FILE_NAME, MetaDocument};
use crate::proxy::{DevEnvironment, PathStyle};

/// Flag that switches on development diagnostics
pub const WATCH_FLAG: &str = "--watch";

/// True when `args` contains the exact `--watch` token
pub fn is_watch_mode<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().any(|arg| arg.as_ref() == WATCH_FLAG)
}

/// Outcome of one post-build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBuildReport {
    /// Where the strict metadata was written
    pub meta_output: PathBuf,
    /// Exactly the bytes that were written
    pub formatted_meta: String,
    /// Present only on the run that printed the development banner
    pub announced: Option<DevEnvironment>,
}

/// Post-processor bound to one app identity
#[derive(Debug)]
pub struct PostProcessor {
    identity: AppIdentity,
    options: LappPluginOptions,
    watch: bool,
    colored: bool,
    announced: AtomicBool,
    browser: Arc<dyn BrowserOpener>,
}

impl PostProcessor {
    /// Load the manifest and prepare a processor
    ///
    /// # Errors
    ///
    /// Fails before touching the metadata file or the build directory when
    /// the manifest is unreadable or lacks a valid `appKey`, `version` or
    /// `platform`.
    pub fn new(options: LappPluginOptions) -> Result<Self> {
        let identity = AppIdentity::load(&options.manifest_path())?;
        Ok(Self::with_identity(identity, options))
    }

    /// Build a processor around an identity that was validated elsewhere
    pub fn with_identity(identity: AppIdentity, options: LappPluginOptions) -> Self {
        let watch = options.watch.unwrap_or_else(|| {
            is_watch_mode(std::env::args_os().filter_map(|arg| arg.into_string().ok()))
        });
        let colored = options.color.unwrap_or_else(should_use_color);
        Self {
            identity,
            options,
            watch,
            colored,
            announced: AtomicBool::new(false),
            browser: Arc::new(SystemBrowser),
        }
    }

    /// Replace the browser used when `openBrowser` is enabled
    pub fn with_browser(mut self, browser: Arc<dyn BrowserOpener>) -> Self {
        self.browser = browser;
        self
    }

    /// App identity read from the manifest
    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    pub fn options(&self) -> &LappPluginOptions {
        &self.options
    }

    /// Whether this processor runs in watch mode
    pub fn is_watch(&self) -> bool {
        self.watch
    }

    /// Whether the development banner has already been shown
    pub fn has_announced(&self) -> bool {
        self.announced.load(Ordering::Acquire)
    }

    /// Absolute, lexically normalized build output directory
    pub fn absolute_build_dir(&self) -> Result<PathBuf> {
        Ok(absolutize(&self.options.build_path())?)
    }

    /// Development environment for this app, without printing anything
    pub fn dev_environment(&self) -> Result<DevEnvironment> {
        let build_dir = self.absolute_build_dir()?;
        Ok(DevEnvironment::derive(
            &self.identity,
            &self.options,
            &build_dir,
            PathStyle::native(),
        ))
    }

    /// Handle one build-completion event
    ///
    /// Reads the metadata file, writes its strict copy into the build
    /// directory and, on the first call in watch mode, prints the banner.
    ///
    /// # Errors
    ///
    /// Returns [`LappError::MetaRead`](crate::LappError::MetaRead) or
    /// [`LappError::MetaParse`](crate::LappError::MetaParse) for a bad
    /// source file and [`LappError::MetaWrite`](crate::LappError::MetaWrite)
    /// when the build directory cannot be written. Nothing is announced
    /// after a failure.
    pub fn on_build_complete(&self) -> Result<PostBuildReport> {
        let meta_source = self.options.meta_path();
        tracing::debug!("reading {}", meta_source.display());
        let document = MetaDocument::read(&meta_source)?;

        let build_dir = self.options.build_path();
        let formatted_meta = document.write_into(&build_dir)?;
        let meta_output = build_dir.join(META_FILE_NAME);
        tracing::info!("wrote {}", meta_output.display());

        let announced = if self.watch && self.claim_announcement() {
            Some(self.announce(&formatted_meta)?)
        } else {
            None
        };

        Ok(PostBuildReport {
            meta_output,
            formatted_meta,
            announced,
        })
    }

    /// Flip the one-shot flag; only the first caller gets `true`
    fn claim_announcement(&self) -> bool {
        self.announced
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn announce(&self, formatted_meta: &str) -> Result<DevEnvironment> {
        let env = self.dev_environment()?;
        Banner::new(formatted_meta, &env).print(self.colored);

        if self.options.open_browser {
            if let Err(err) = self.browser.open(&env.dev_url) {
                tracing::warn!("failed to open {}: {err}", env.dev_url);
            }
        }

        Ok(env)
    }
}

fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.clean())
    } else {
        Ok(std::env::current_dir()?.join(path).clean())
    }
}

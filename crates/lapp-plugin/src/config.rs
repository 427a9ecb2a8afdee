//! Plugin options
//!
//! Every option has a default matching the conventions of a lapp project, so
//! most projects need no configuration at all. When present, options are
//! layered with figment:
//!
//! 1. built-in defaults
//! 2. `lapp.config.json` in the project root
//! 3. `LAPP_*` environment variables (`LAPP_BUILD_DIR=dist` sets `buildDir`)
//!
//! Callers (the CLI) may merge their own overrides on top via
//! [`LappPluginOptions::figment`].

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::meta::META_FILE_NAME;
use crate::proxy::{CdnPaths, PlaceholderEscape};

/// Name of the optional options file in the project root
pub const CONFIG_FILE_NAME: &str = "lapp.config.json";

/// Configuration for the lapp plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LappPluginOptions {
    /// Project root; relative paths below resolve against it
    ///
    /// `None` means the current working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Comment-tolerant metadata source file
    pub meta_file: PathBuf,

    /// Manifest holding `appKey`, `version` and `platform`
    pub manifest: PathBuf,

    /// Bundler output directory the strict metadata is written into
    pub build_dir: PathBuf,

    /// Page that bootstraps the app in development
    pub dev_base_url: String,

    /// CDN host the app is served from in production
    pub cdn_domain: String,

    /// Per-platform path prefix on the CDN
    pub cdn_paths: CdnPaths,

    /// Where to get the local proxy tool
    pub proxy_tool_url: String,

    pub placeholder_escape: PlaceholderEscape,

    /// Open the development URL once the first watch build is done
    pub open_browser: bool,

    /// Force watch mode on or off; `None` looks for `--watch` in the process args
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,

    /// Force colored output on or off; `None` detects terminal support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl Default for LappPluginOptions {
    fn default() -> Self {
        Self {
            root: None,
            meta_file: PathBuf::from(META_FILE_NAME),
            manifest: PathBuf::from("package.json"),
            build_dir: PathBuf::from("build"),
            dev_base_url: "https://page.1688.com/html/isv-bridge.html".to_string(),
            cdn_domain: "1688-lapp.oss-cn-hangzhou.aliyuncs.com".to_string(),
            cdn_paths: CdnPaths::default(),
            proxy_tool_url: "https://www.npmmirror.com/package/whistle".to_string(),
            placeholder_escape: PlaceholderEscape::Auto,
            open_browser: false,
            watch: None,
            color: None,
        }
    }
}

impl LappPluginOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options for the project rooted at `root`
    ///
    /// # Arguments
    ///
    /// * `root` - Project directory; also used as `root` unless the config
    ///   file or `LAPP_ROOT` sets one
    ///
    /// # Errors
    ///
    /// Returns [`LappError::Config`](crate::LappError::Config) when the
    /// config file is malformed or a value has the wrong type
    pub fn load(root: &Path) -> Result<Self> {
        let mut options: Self = Self::figment(root, None).extract()?;
        options.root.get_or_insert_with(|| root.to_path_buf());
        Ok(options)
    }

    /// Layered figment for the project rooted at `root`
    ///
    /// `config_file` replaces the default `<root>/lapp.config.json`; a
    /// missing default file is skipped silently.
    pub fn figment(root: &Path, config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let file = config_file
            .map(Path::to_path_buf)
            .or_else(|| Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.exists()));
        if let Some(path) = file {
            tracing::debug!("loading lapp options from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        figment.merge(
            Env::prefixed("LAPP_")
                .map(|key| env_key_to_field(key.as_str()).into())
                .lowercase(false),
        )
    }

    /// Set the project root that relative paths resolve against
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the metadata source file, relative to the root
    pub fn with_meta_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.meta_file = path.into();
        self
    }

    /// Set the manifest file, relative to the root
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = path.into();
        self
    }

    /// Set the build output directory, relative to the root
    pub fn with_build_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.build_dir = path.into();
        self
    }

    /// Force watch mode on or off instead of detecting `--watch`
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = Some(watch);
        self
    }

    /// Open the development URL after the first watch build
    pub fn with_open_browser(mut self, enabled: bool) -> Self {
        self.open_browser = enabled;
        self
    }

    /// Force banner colors on or off instead of detecting the terminal
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color = Some(enabled);
        self
    }

    /// Choose how the proxy rule placeholder is escaped
    pub fn with_placeholder_escape(mut self, escape: PlaceholderEscape) -> Self {
        self.placeholder_escape = escape;
        self
    }

    /// Project root, falling back to the current directory
    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => PathBuf::from("."),
        }
    }

    /// Resolved path of the metadata source file
    pub fn meta_path(&self) -> PathBuf {
        self.root_dir().join(&self.meta_file)
    }

    /// Resolved path of package.json
    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir().join(&self.manifest)
    }

    /// Resolved build directory, possibly relative
    pub fn build_path(&self) -> PathBuf {
        self.root_dir().join(&self.build_dir)
    }
}

/// `build_dir` → `buildDir`, `cdn_paths.pc` → `cdnPaths.pc`
fn env_key_to_field(key: &str) -> String {
    key.split('.')
        .map(|segment| {
            let mut out = String::with_capacity(segment.len());
            let mut upper = false;
            for ch in segment.chars() {
                if ch == '_' {
                    upper = true;
                } else if upper {
                    out.extend(ch.to_uppercase());
                    upper = false;
                } else {
                    out.extend(ch.to_lowercase());
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join(".")
}

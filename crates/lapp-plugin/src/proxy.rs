//! Development environment derivation
//!
//! In watch mode the plugin tells the developer how to point a local proxy
//! (whistle) at the build output and which page to open. Everything here is
//! pure string building so it can be checked without touching the disk.
//!
//! A proxy rule looks like:
//!
//! ```text
//! ^***<cdn-domain>/<platform-segment><appKey>/*/*** file://<abs-build-dir><sep><placeholder>
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::LappPluginOptions;
use crate::manifest::{AppIdentity, Platform};

/// Capture group the proxy substitutes with the requested file path
const CAPTURE_PLACEHOLDER: &str = "$3";

/// Separator convention of the filesystem the build directory lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Posix,
    Windows,
}

impl PathStyle {
    /// Style of the platform this binary was built for
    pub fn native() -> Self {
        if std::path::MAIN_SEPARATOR == '\\' {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    pub fn separator(self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }
}

/// Whether the capture placeholder gets an extra `\` in front of it
///
/// whistle reads `\$` in a Windows path as an escape sequence, so `auto`
/// adds the escape only for back-slash paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderEscape {
    #[default]
    Auto,
    Always,
    Never,
}

impl PlaceholderEscape {
    fn applies_to(self, style: PathStyle) -> bool {
        match self {
            PlaceholderEscape::Auto => style == PathStyle::Windows,
            PlaceholderEscape::Always => true,
            PlaceholderEscape::Never => false,
        }
    }
}

/// CDN path prefix per platform; the app key is appended directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdnPaths {
    pub pc: String,
    pub mobile: String,
}

impl Default for CdnPaths {
    fn default() -> Self {
        Self {
            pc: "pc-pc_work-pc_work_plugin-".to_string(),
            mobile: "mobile-mobile_work-mobile_work_plugin-".to_string(),
        }
    }
}

impl CdnPaths {
    /// Path prefix used for `platform`
    pub fn for_platform(&self, platform: Platform) -> &str {
        match platform {
            Platform::Pc => &self.pc,
            Platform::Mobile => &self.mobile,
        }
    }
}

/// Everything shown to the developer after the first watch build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevEnvironment {
    pub dev_url: String,
    pub build_dir: String,
    pub proxy_rule: String,
    pub proxy_tool_url: String,
}

impl DevEnvironment {
    /// Derive the environment for `identity` serving files from `build_dir`
    ///
    /// `build_dir` must already be absolute.
    pub fn derive(
        identity: &AppIdentity,
        options: &LappPluginOptions,
        build_dir: &Path,
        style: PathStyle,
    ) -> Self {
        let build_dir = build_dir.display().to_string();
        let proxy_rule = proxy_rule(
            &options.cdn_domain,
            options.cdn_paths.for_platform(identity.platform),
            &identity.app_key,
            &build_dir,
            style,
            options.placeholder_escape,
        );

        Self {
            dev_url: dev_url(&options.dev_base_url, identity),
            build_dir,
            proxy_rule,
            proxy_tool_url: options.proxy_tool_url.clone(),
        }
    }
}

/// Page that loads the app from the CDN (or the local proxy)
///
/// PC apps keep the historical two-parameter URL; only MOBILE adds
/// `platform`.
pub fn dev_url(base: &str, identity: &AppIdentity) -> String {
    let mut url = format!(
        "{base}?appKey={}&version={}",
        identity.app_key, identity.version
    );
    if identity.platform == Platform::Mobile {
        url.push_str("&platform=");
        url.push_str(Platform::Mobile.as_str());
    }
    url
}

/// Build a whistle rule mapping the CDN copy of the app onto `build_dir`
pub fn proxy_rule(
    cdn_domain: &str,
    platform_segment: &str,
    app_key: &str,
    build_dir: &str,
    style: PathStyle,
    escape: PlaceholderEscape,
) -> String {
    let escape = if escape.applies_to(style) { "\\" } else { "" };
    let sep = style.separator();
    format!(
        "^***{cdn_domain}/{platform_segment}{app_key}/*/*** \
         file://{build_dir}{sep}{escape}{CAPTURE_PLACEHOLDER}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "1688-lapp.oss-cn-hangzhou.aliyuncs.com";

    #[test]
    fn test_dev_url_pc_has_no_platform() {
        let identity = AppIdentity::new("abc123", "1.0.0", Platform::Pc);
        assert_eq!(
            dev_url("https://page.1688.com/html/isv-bridge.html", &identity),
            "https://page.1688.com/html/isv-bridge.html?appKey=abc123&version=1.0.0"
        );
    }

    #[test]
    fn test_dev_url_mobile_appends_platform() {
        let identity = AppIdentity::new("abc123", "2.1.0", Platform::Mobile);
        assert_eq!(
            dev_url("https://page.1688.com/html/isv-bridge.html", &identity),
            "https://page.1688.com/html/isv-bridge.html?appKey=abc123&version=2.1.0&platform=MOBILE"
        );
    }

    #[test]
    fn test_proxy_rule_posix() {
        let rule = proxy_rule(
            DOMAIN,
            "pc-pc_work-pc_work_plugin-",
            "abc123",
            "/home/dev/app/build",
            PathStyle::Posix,
            PlaceholderEscape::Auto,
        );
        assert_eq!(
            rule,
            "^***1688-lapp.oss-cn-hangzhou.aliyuncs.com/pc-pc_work-pc_work_plugin-abc123/*/*** \
             file:///home/dev/app/build/$3"
        );
    }

    #[test]
    fn test_proxy_rule_windows_escapes_placeholder() {
        let rule = proxy_rule(
            DOMAIN,
            "pc-pc_work-pc_work_plugin-",
            "abc123",
            r"C:\dev\app\build",
            PathStyle::Windows,
            PlaceholderEscape::Auto,
        );
        assert!(rule.ends_with(r"file://C:\dev\app\build\\$3"), "{rule}");
    }

    #[test]
    fn test_placeholder_escape_overrides() {
        let always = proxy_rule(
            DOMAIN,
            "p-",
            "k",
            "/b",
            PathStyle::Posix,
            PlaceholderEscape::Always,
        );
        assert!(always.ends_with(r"/b/\$3"));

        let never = proxy_rule(
            DOMAIN,
            "p-",
            "k",
            r"C:\b",
            PathStyle::Windows,
            PlaceholderEscape::Never,
        );
        assert!(never.ends_with(r"C:\b\$3"));
        assert!(!never.ends_with(r"\\$3"));
    }

    #[test]
    fn test_derive_uses_platform_segment() {
        let options = LappPluginOptions::default();
        let identity = AppIdentity::new("m1", "0.0.1", Platform::Mobile);
        let build_dir = Path::new("/srv/build");
        let env = DevEnvironment::derive(&identity, &options, build_dir, PathStyle::Posix);

        assert!(
            env.proxy_rule
                .contains("/mobile-mobile_work-mobile_work_plugin-m1/*/***")
        );
        assert_eq!(env.build_dir, "/srv/build");
        assert!(env.dev_url.ends_with("&platform=MOBILE"));
        assert_eq!(env.proxy_tool_url, "https://www.npmmirror.com/package/whistle");
    }
}

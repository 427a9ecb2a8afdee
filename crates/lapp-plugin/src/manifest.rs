//! Application identity read from package.json
//!
//! The lapp plugin needs three fields from the manifest:
//!
//! ```json
//! {
//!   "appKey": "abc123",
//!   "version": "1.0.0",
//!   "platform": "PC"
//! }
//! ```
//!
//! All three are validated up front so a misconfigured project fails before
//! the bundler does any work.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LappError, Result};

/// Target platform of a lapp app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Pc,
    Mobile,
}

impl Platform {
    /// Spelling used in package.json and in the dev URL
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::Mobile => "MOBILE",
        }
    }

    /// Parse the exact manifest spelling; anything else is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PC" => Some(Platform::Pc),
            "MOBILE" => Some(Platform::Mobile),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the app being built
///
/// Immutable once loaded; the processor keeps one copy for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppIdentity {
    pub app_key: String,
    pub version: String,
    pub platform: Platform,
}

impl AppIdentity {
    pub fn new(app_key: impl Into<String>, version: impl Into<String>, platform: Platform) -> Self {
        Self {
            app_key: app_key.into(),
            version: version.into(),
            platform,
        }
    }

    /// Read and validate the identity fields of a package.json file
    ///
    /// # Errors
    ///
    /// Returns `ManifestRead`/`ManifestParse` for an unreadable file and
    /// `InvalidManifestField` for the first bad field, checked in the order
    /// `appKey`, `version`, `platform`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LappError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Value =
            serde_json::from_str(&content).map_err(|source| LappError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let identity = Self::from_manifest(&manifest)?;
        tracing::debug!(
            app_key = %identity.app_key,
            version = %identity.version,
            platform = %identity.platform,
            "loaded app identity from {}",
            path.display()
        );
        Ok(identity)
    }

    /// Validate the identity fields of an already parsed manifest
    ///
    /// Fields are checked in manifest order (`appKey`, `version`, `platform`)
    /// and the first offending one is reported.
    pub fn from_manifest(manifest: &Value) -> Result<Self> {
        let app_key = manifest
            .get("appKey")
            .and_then(Value::as_str)
            .ok_or_else(|| LappError::invalid_field("appKey", "appKey must be a string"))?;

        let version = manifest
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| LappError::invalid_field("version", "version must be a string"))?;

        let platform = manifest
            .get("platform")
            .and_then(Value::as_str)
            .and_then(Platform::parse)
            .ok_or_else(|| {
                LappError::invalid_field("platform", "platform must be either \"PC\" or \"MOBILE\"")
            })?;

        Ok(Self::new(app_key, version, platform))
    }
}

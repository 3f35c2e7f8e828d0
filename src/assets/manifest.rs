//! Versioned manifest of static portal assets
//!
//! The manifest is fixed per release: shipping a changed asset requires
//! bumping the version string, which creates a new cache generation and
//! retires the old one on activation.

use serde::{Deserialize, Serialize};

/// Version of the built-in manifest
pub const ASSET_VERSION: &str = "v2.1.0";

/// A fixed, versioned list of asset URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Names the cache generation holding these assets
    pub version: String,
    pub urls: Vec<String>,
}

impl AssetManifest {
    pub fn new(version: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            version: version.into(),
            urls,
        }
    }

    /// The static resources the portal serves alongside its API: reference
    /// documents rendered by the client and branding bits.
    pub fn builtin(portal_base: &str) -> Self {
        let base = portal_base.trim_end_matches('/');
        let urls = [
            "assets/leave-policy.md",
            "assets/holidays.json",
            "assets/departments.json",
            "assets/logo.txt",
        ]
        .iter()
        .map(|path| format!("{}/{}", base, path))
        .collect();

        Self::new(ASSET_VERSION, urls)
    }
}

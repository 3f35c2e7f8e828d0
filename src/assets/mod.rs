//! Offline cache for the portal's static assets
//!
//! A coarse, versioned companion to the request cache: a fixed manifest of
//! static resources is downloaded once per version (all-or-nothing), served
//! cache-first by exact URL afterwards, and stale generations are deleted
//! when a new version activates. Losing this cache never blocks online
//! operation.

mod manifest;
mod store;

pub use manifest::{AssetManifest, ASSET_VERSION};
pub use store::{AssetError, AssetStore};

use chrono::NaiveDate;
use serde::Deserialize;

/// A public holiday from the portal's static `holidays.json` asset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Parses the body of `holidays.json`
pub fn parse_holidays(bytes: &[u8]) -> Result<Vec<Holiday>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

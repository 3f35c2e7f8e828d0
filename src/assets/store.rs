//! Disk-backed store of asset cache generations
//!
//! Each manifest version owns one directory under the cache root, with
//! assets keyed by the hex SHA-256 of their URL. The lifecycle has three
//! transitions: install populates a generation all-or-nothing, fetch serves
//! cache-first by exact URL, activate deletes every generation but the
//! current one.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::api::{ApiError, Transport};

use super::manifest::AssetManifest;

/// Errors from the asset store
#[derive(Debug, Error)]
pub enum AssetError {
    /// Downloading a manifest entry or an uncached URL failed
    #[error("asset fetch failed: {0}")]
    Fetch(#[from] ApiError),

    /// Reading or writing the cache directory failed
    #[error("asset cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store of versioned asset generations on disk
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
    manifest: AssetManifest,
}

impl AssetStore {
    /// Creates a store under the platform cache directory
    /// (`~/.cache/leavedesk/assets` on Linux)
    ///
    /// Returns `None` when no cache directory can be determined; the caller
    /// runs without offline assets in that case.
    pub fn new(manifest: AssetManifest) -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "leavedesk")?;
        let root = project_dirs.cache_dir().join("assets");
        Some(Self { root, manifest })
    }

    /// Creates a store rooted at a custom directory, for tests
    #[allow(dead_code)]
    pub fn with_root(root: PathBuf, manifest: AssetManifest) -> Self {
        Self { root, manifest }
    }

    /// The manifest this store serves
    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Directory of the current generation
    fn generation_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.version)
    }

    /// Directory used while a generation is being populated
    fn staging_dir(&self) -> PathBuf {
        self.root.join(format!("{}.partial", self.manifest.version))
    }

    /// File path of a cached asset: assets are keyed by the digest of their
    /// exact URL
    fn asset_file(dir: &Path, url: &str) -> PathBuf {
        dir.join(hex::encode(Sha256::digest(url.as_bytes())))
    }

    /// Whether the current generation has been fully installed
    pub fn is_installed(&self) -> bool {
        self.generation_dir().is_dir()
    }

    /// Downloads every manifest URL into the current generation
    ///
    /// Population is all-or-nothing: assets land in a staging directory
    /// which is promoted with a single rename once every fetch succeeded. A
    /// failed fetch removes the staging directory and propagates, leaving no
    /// generation behind. Installing an already-installed version is a
    /// no-op.
    pub async fn install<T: Transport>(&self, transport: &T) -> Result<(), AssetError> {
        if self.is_installed() {
            return Ok(());
        }

        let staging = self.staging_dir();
        if staging.exists() {
            // Leftover from a crashed install; start over.
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        for url in &self.manifest.urls {
            match transport.get_bytes(url).await {
                Ok(bytes) => fs::write(Self::asset_file(&staging, url), bytes)?,
                Err(err) => {
                    let _ = fs::remove_dir_all(&staging);
                    return Err(AssetError::Fetch(err));
                }
            }
        }

        fs::rename(&staging, self.generation_dir())?;
        Ok(())
    }

    /// Returns the asset at `url`, serving the current generation first
    ///
    /// A cached asset is read from disk with no network access. On a miss
    /// the URL is fetched over the network and the response returned without
    /// being stored; only install populates the cache.
    pub async fn fetch<T: Transport>(&self, transport: &T, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = Self::asset_file(&self.generation_dir(), url);
        if path.is_file() {
            return Ok(fs::read(path)?);
        }
        Ok(transport.get_bytes(url).await?)
    }

    /// Deletes every generation whose name differs from the current version
    ///
    /// Runs when a new version takes over; afterwards exactly one generation
    /// remains. Returns the names of the removed generations.
    pub fn activate(&self) -> Result<Vec<String>, AssetError> {
        let mut removed = Vec::new();
        if !self.root.is_dir() {
            return Ok(removed);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == self.manifest.version {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            removed.push(name);
        }

        Ok(removed)
    }

    /// Names of all generations currently on disk
    #[allow(dead_code)]
    pub fn generations(&self) -> Result<Vec<String>, AssetError> {
        let mut names = Vec::new();
        if !self.root.is_dir() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.root)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Transport serving scripted asset bodies, optionally failing on one URL
    struct AssetTransport {
        bodies: HashMap<String, Vec<u8>>,
        fail_on: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl AssetTransport {
        fn new(bodies: &[(&str, &[u8])]) -> Self {
            Self {
                bodies: bodies
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_vec()))
                    .collect(),
                fail_on: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing_on(mut self, url: &str) -> Self {
            self.fail_on = Some(url.to_string());
            self
        }
    }

    impl Transport for AssetTransport {
        async fn get_json(
            &self,
            _action: &str,
            _params: &[(String, String)],
        ) -> Result<Value, ApiError> {
            Err(ApiError::Network("not an API transport".to_string()))
        }

        async fn download(
            &self,
            _action: &str,
            _params: &[(String, String)],
        ) -> Result<Vec<u8>, ApiError> {
            Err(ApiError::Network("not an API transport".to_string()))
        }

        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(url) {
                return Err(ApiError::Network("asset unreachable".to_string()));
            }
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::Network(format!("HTTP 404 from {}", url)))
        }
    }

    fn manifest(version: &str, urls: &[&str]) -> AssetManifest {
        AssetManifest::new(version, urls.iter().map(|u| u.to_string()).collect())
    }

    fn store_in(dir: &TempDir, version: &str, urls: &[&str]) -> AssetStore {
        AssetStore::with_root(dir.path().to_path_buf(), manifest(version, urls))
    }

    #[tokio::test]
    async fn test_install_populates_generation() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &["https://p.test/a.md", "https://p.test/b.json"]);
        let transport = AssetTransport::new(&[
            ("https://p.test/a.md", b"policy"),
            ("https://p.test/b.json", b"{}"),
        ]);

        assert!(!store.is_installed());
        store.install(&transport).await.expect("install should succeed");
        assert!(store.is_installed());
        assert_eq!(store.generations().unwrap(), vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &["https://p.test/a.md", "https://p.test/b.json"]);
        let transport = AssetTransport::new(&[("https://p.test/a.md", b"policy")])
            .failing_on("https://p.test/b.json");

        let result = store.install(&transport).await;

        assert!(result.is_err(), "A failed manifest fetch must abort install");
        assert!(!store.is_installed());
        assert!(
            store.generations().unwrap().is_empty(),
            "No generation (or staging leftover) may survive a failed install"
        );
    }

    #[tokio::test]
    async fn test_install_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &["https://p.test/a.md"]);
        let transport = AssetTransport::new(&[("https://p.test/a.md", b"policy")]);

        store.install(&transport).await.expect("first install");
        let calls_after_first = transport.calls.load(Ordering::SeqCst);
        store.install(&transport).await.expect("second install");

        assert_eq!(
            transport.calls.load(Ordering::SeqCst),
            calls_after_first,
            "Installing an installed version must not refetch"
        );
    }

    #[tokio::test]
    async fn test_cached_fetch_never_reaches_the_network() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &["https://p.test/a.md"]);
        let install_transport = AssetTransport::new(&[("https://p.test/a.md", b"policy")]);
        store
            .install(&install_transport)
            .await
            .expect("install should succeed");

        // Fresh transport: any network call would be visible on its counter.
        let fetch_transport = AssetTransport::new(&[]);
        let body = store
            .fetch(&fetch_transport, "https://p.test/a.md")
            .await
            .expect("cached fetch should succeed");

        assert_eq!(body, b"policy");
        assert_eq!(fetch_transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_uncached_fetch_falls_through_and_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &[]);
        let transport = AssetTransport::new(&[("https://p.test/extra.json", b"[]")]);

        let body = store
            .fetch(&transport, "https://p.test/extra.json")
            .await
            .expect("network fetch should succeed");
        assert_eq!(body, b"[]");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        // Pure cache-first: the miss was not written back.
        store
            .fetch(&transport, "https://p.test/extra.json")
            .await
            .expect("second fetch should succeed");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_when_uncached() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &[]);
        let transport = AssetTransport::new(&[]);

        let result = store.fetch(&transport, "https://p.test/missing.md").await;
        assert!(matches!(result, Err(AssetError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_activate_deletes_stale_generations() {
        let dir = TempDir::new().unwrap();

        // v1 was installed by a previous release.
        let old = store_in(&dir, "v1", &["https://p.test/a.md"]);
        let transport = AssetTransport::new(&[("https://p.test/a.md", b"old")]);
        old.install(&transport).await.expect("v1 install");

        // v2 takes over.
        let new = store_in(&dir, "v2", &["https://p.test/a.md"]);
        let transport = AssetTransport::new(&[("https://p.test/a.md", b"new")]);
        new.install(&transport).await.expect("v2 install");

        let removed = new.activate().expect("activate should succeed");

        assert_eq!(removed, vec!["v1".to_string()]);
        assert_eq!(new.generations().unwrap(), vec!["v2".to_string()]);
    }

    #[tokio::test]
    async fn test_activate_removes_stale_staging_leftovers() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v2", &["https://p.test/a.md"]);
        let transport = AssetTransport::new(&[("https://p.test/a.md", b"new")]);
        store.install(&transport).await.expect("install");

        // Simulate a crashed install of some other version.
        fs::create_dir_all(dir.path().join("v1.partial")).unwrap();

        let removed = store.activate().expect("activate should succeed");
        assert_eq!(removed, vec!["v1.partial".to_string()]);
        assert_eq!(store.generations().unwrap(), vec!["v2".to_string()]);
    }

    #[test]
    fn test_activate_on_empty_root_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, "v1", &[]);
        // Root exists but holds nothing.
        assert!(store.activate().unwrap().is_empty());
    }

    #[test]
    fn test_asset_file_distinguishes_urls() {
        let dir = Path::new("/tmp/assets/v1");
        let a = AssetStore::asset_file(dir, "https://p.test/a.md");
        let b = AssetStore::asset_file(dir, "https://p.test/b.md");
        assert_ne!(a, b);
        // Deterministic: the same URL always maps to the same file.
        assert_eq!(a, AssetStore::asset_file(dir, "https://p.test/a.md"));
    }
}

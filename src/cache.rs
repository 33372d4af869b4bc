//! HTTP client ownership and on-disk cache for reference data.
//!
//! The holiday reference table can be pulled from its remote location. The
//! first download is stored in the cache directory and reused afterwards;
//! provider responses are never written to disk.

use crate::config;
use crate::error::{ForecastError, Provider, Result};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Owns the lazily built HTTP client and the reference file cache.
pub struct CacheManager {
    /// Directory where cached reference files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download anything (use cached files only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. The directory itself is created on first download.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Self {
        Self {
            cache_dir: cache_dir.unwrap_or_else(config::default_cache_dir),
            offline,
            timeout,
            client: None,
        }
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| ForecastError::InvalidArgument("HTTP client unavailable".into()))
    }

    /// Download a single file.
    ///
    /// Downloads to a temp file first and renames on success, so an
    /// interrupted download never leaves a partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        info!(url, "downloading reference file");

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_dest = dest.with_extension("csv.tmp");

        let client = self.client()?.clone();
        let fetch_err = |source: reqwest::Error| ForecastError::Fetch {
            provider: Provider::Calendar,
            source,
        };
        let result = (|| -> Result<()> {
            let bytes = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(fetch_err)?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }
        result
    }

    /// Ensure the holiday reference file is cached locally, downloading it
    /// from `url` if needed.
    pub fn ensure_reference(&mut self, url: &str) -> Result<PathBuf> {
        let local_path = self.cache_dir.join(config::CALENDAR_REFERENCE_FILE);
        if local_path.exists() {
            debug!(path = %local_path.display(), "using cached reference file");
            return Ok(local_path);
        }
        if self.offline {
            return Err(ForecastError::NotFound(format!(
                "Reference file {} not cached and offline mode is enabled",
                config::CALENDAR_REFERENCE_FILE
            )));
        }
        self.download_file(url, &local_path)?;
        Ok(local_path)
    }

    /// Read the cached reference file, downloading it first when missing.
    pub fn load_reference(&mut self, url: &str) -> Result<String> {
        let path = self.ensure_reference(url)?;
        Ok(fs::read_to_string(path)?)
    }

    /// Remove the cached reference file and any leftover partial download.
    ///
    /// Nothing else in `cache_dir` is touched.
    pub fn clear(&self) -> Result<()> {
        let reference = self.cache_dir.join(config::CALENDAR_REFERENCE_FILE);
        for path in [reference.with_extension("csv.tmp"), reference] {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed cached file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Whether the HTTP client has been built.
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Drop the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}

//! Startup prefetch of known icon assets.
//!
//! Keeps a local cache of commonly-wanted application icons so the frontend
//! icon picker has something to offer out of the box. The cache is populated
//! opportunistically at startup: icons already present are left alone,
//! missing ones are fetched from the asset CDN, and every failure is
//! swallowed. The launcher registry never consults this cache.

use std::path::{Path, PathBuf};

use crate::config::NetworkConfig;
use crate::error::Result;
use tracing::{debug, info};

/// Known icon assets, as `(name, url)` pairs.
pub const KNOWN_ICONS: &[(&str, &str)] = &[
    ("openai", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/openai.png"),
    ("claude", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/claude.png"),
    ("gemini", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/gemini.png"),
    ("ollama", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/ollama.png"),
    ("microsoft", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/microsoft.png"),
    ("meta", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/meta.png"),
    ("midjourney", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/midjourney.png"),
    ("mistral", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/mistral.png"),
    ("stability", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/stability.png"),
    ("huggingface", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/huggingface.png"),
    ("dalle", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/dalle.png"),
    ("copilot", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/copilot.png"),
    ("perplexity", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/perplexity.png"),
    ("google", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/google.png"),
    ("grok", "https://cdn.jsdelivr.net/gh/lobehub/assets@main/icons/ai/grok.png"),
];

/// Local cache of known icon assets.
#[derive(Clone)]
pub struct IconCache {
    /// Directory the cached icons live in.
    cache_dir: PathBuf,
    /// HTTP client for asset fetches.
    client: reqwest::Client,
}

impl IconCache {
    /// Create an icon cache over the given directory.
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(NetworkConfig::FETCH_TIMEOUT)
            .connect_timeout(NetworkConfig::CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            client,
        })
    }

    /// The cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path a named icon is cached at.
    pub fn icon_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.png", name))
    }

    /// Ensure every known icon is present in the cache, fetching the missing
    /// ones. Best-effort throughout: fetch and write failures are logged at
    /// debug level and skipped.
    ///
    /// Returns the number of icons fetched.
    pub async fn ensure_known_icons(&self) -> usize {
        if let Err(e) = tokio::fs::create_dir_all(&self.cache_dir).await {
            debug!("Failed to create icon cache directory: {}", e);
            return 0;
        }

        let mut fetched = 0;
        for (name, url) in KNOWN_ICONS {
            let path = self.icon_path(name);
            if path.exists() {
                continue;
            }

            match self.fetch_icon(url, &path).await {
                Ok(()) => {
                    debug!("Fetched icon {} into cache", name);
                    fetched += 1;
                }
                Err(e) => debug!("Failed to fetch icon {}: {}", name, e),
            }
        }

        if fetched > 0 {
            info!("Icon cache: fetched {} missing icon(s)", fetched);
        }

        fetched
    }

    async fn fetch_icon(&self, url: &str, dest: &Path) -> Result<()> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| crate::error::AppdockError::io_with_path(e, dest))?;

        Ok(())
    }

    /// List the icons currently present in the cache.
    pub fn cached_icons(&self) -> Vec<(String, PathBuf)> {
        KNOWN_ICONS
            .iter()
            .filter_map(|(name, _)| {
                let path = self.icon_path(name);
                path.exists().then(|| (name.to_string(), path))
            })
            .collect()
    }
}

//! Optional icon download.
//!
//! The icon is a nice-to-have: any failure here is logged and the build
//! continues with [`IconAsset::Unavailable`].

use super::settings::BuildConfig;
use crate::error::AssetError;
use bytes::Bytes;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound on the icon download.
pub const DEFAULT_ICON_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Outcome of the icon step.
#[derive(Debug)]
pub enum IconAsset {
    /// Icon written to disk; path is relative to the tool directory.
    Ready(PathBuf),
    /// No `ICON` was configured.
    NotRequested,
    /// An icon was requested but could not be provided.
    Unavailable(AssetError),
}

impl IconAsset {
    /// Path to hand to the packaging tool, if an icon is available.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Ready(path) => Some(path),
            Self::NotRequested | Self::Unavailable(_) => None,
        }
    }
}

/// Retrieves remote icon content.
pub trait IconFetcher {
    /// Downloads `uri`, giving up after `timeout`.
    fn fetch(
        &self,
        uri: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Bytes, AssetError>> + Send;
}

/// [`IconFetcher`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpIconFetcher {
    client: reqwest::Client,
}

impl HttpIconFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client (proxy settings, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl IconFetcher for HttpIconFetcher {
    async fn fetch(&self, uri: &str, timeout: Duration) -> Result<Bytes, AssetError> {
        log::info!("Downloading icon from {}", uri);

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                AssetError::Timeout(timeout.as_millis())
            } else {
                AssetError::Http(e)
            }
        };

        // Request timeout covers connect, headers and body.
        let response = self
            .client
            .get(uri)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status(status.as_u16()));
        }

        response.bytes().await.map_err(map_err)
    }
}

/// Resolves the icon for a build.
#[derive(Debug)]
pub struct AssetAcquirer<F> {
    fetcher: F,
    timeout: Duration,
}

impl<F: IconFetcher> AssetAcquirer<F> {
    pub fn new(fetcher: F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    /// Downloads the configured icon into `work_dir` as `icon.<ext>`.
    ///
    /// Never fails. Platforms without a known icon format skip the network
    /// call entirely.
    pub async fn acquire(&self, config: &BuildConfig, work_dir: &Path) -> IconAsset {
        let Some(uri) = config.icon() else {
            return IconAsset::NotRequested;
        };

        let platform = config.platform();
        let Some(ext) = platform.icon_extension() else {
            let err = AssetError::UnsupportedPlatform(platform);
            log::warn!("{}", err);
            return IconAsset::Unavailable(err);
        };

        let file_name = PathBuf::from(format!("icon.{ext}"));
        match self.download(uri, &work_dir.join(&file_name)).await {
            Ok(()) => {
                log::debug!("Icon saved as {}", file_name.display());
                IconAsset::Ready(file_name)
            }
            Err(err) => {
                log::error!("Error downloading icon: {}", err);
                log::warn!("Continuing without icon");
                IconAsset::Unavailable(err)
            }
        }
    }

    async fn download(&self, uri: &str, dest: &Path) -> Result<(), AssetError> {
        let data = self.fetcher.fetch(uri, self.timeout).await?;
        tokio::fs::write(dest, &data)
            .await
            .map_err(|source| AssetError::Write {
                path: dest.to_path_buf(),
                source,
            })
    }
}

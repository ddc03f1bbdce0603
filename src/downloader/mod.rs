//! Parallel chunked downloads on top of [`RangeReader`](crate::reader::RangeReader).
//!
//! - `downloader` - the [`Downloader`] orchestrating workers, in memory or to a file
//! - `builder` - [`DownloaderBuilder`] for configuration
//! - `config` - [`DownloaderConfig`] and its defaults
//! - [`plan`] - cutting a resource into chunks
//! - `group` - first-error-wins supervision of the workers
//!
//! The free functions in this module run a downloader with the default
//! configuration and no progress bar.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splinter::http::{create_http_client, HttpClientConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(create_http_client(HttpClientConfig::default())?);
//! let url = "https://example.com/dataset.parquet";
//!
//! let content = splinter::download_with_checksum(
//!     transport,
//!     url,
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;
pub(crate) mod group;
pub mod plan;

pub use builder::DownloaderBuilder;
pub use config::DownloaderConfig;
pub use downloader::Downloader;

use crate::error::Result;
use crate::http::Requester;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;

/// Downloads `url` into memory with the default configuration.
pub async fn download(transport: Arc<dyn Requester>, url: &str) -> Result<Bytes> {
    DownloaderBuilder::hidden().build().download(transport, url).await
}

/// Downloads `url` into memory and verifies its SHA-256 digest.
pub async fn download_with_checksum(
    transport: Arc<dyn Requester>,
    url: &str,
    sha256_hex: &str,
) -> Result<Bytes> {
    DownloaderBuilder::hidden()
        .build()
        .download_with_checksum(transport, url, sha256_hex)
        .await
}

/// Downloads `url` into the file at `path` with the default configuration.
pub async fn download_to_file(
    transport: Arc<dyn Requester>,
    url: &str,
    path: impl AsRef<Path>,
) -> Result<()> {
    DownloaderBuilder::hidden()
        .build()
        .download_to_file(transport, url, path)
        .await
}

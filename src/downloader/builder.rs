//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use splinter::downloader::DownloaderBuilder;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! let shutdown = CancellationToken::new();
//! let downloader = DownloaderBuilder::hidden()
//!     .workers(16)
//!     .chunk_size(1024 * 1024)
//!     .chunk_timeout(Duration::from_secs(30))
//!     .cancellation_token(shutdown.clone())
//!     .build();
//! assert_eq!(downloader.workers(), 16);
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::progress::ProgressBarOpts;

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use splinter::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().workers(8).build();
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        DownloaderBuilder::default().progress(ProgressBarOpts::hidden())
    }

    /// Set the number of chunks fetched concurrently (at least one).
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.max(1);
        self
    }

    /// Set the size of each ranged request (at least one byte).
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.config.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the deadline of a single chunk request.
    pub fn chunk_timeout(mut self, timeout: Duration) -> Self {
        self.config.chunk_timeout = timeout;
        self
    }

    /// Set the progress bar options.
    pub fn progress(mut self, progress: ProgressBarOpts) -> Self {
        self.config.progress = progress;
        self
    }

    /// Abort downloads when `token` is cancelled.
    ///
    /// A download stopped this way fails with [`Error::Cancelled`](crate::Error::Cancelled).
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.config.cancellation = Some(token);
        self
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}

//! Configuration structures and defaults for the downloader.

use super::plan::DEFAULT_CHUNK_SIZE;
use crate::progress::ProgressBarOpts;

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default number of concurrent chunk workers.
///
/// Enough to saturate per-connection throughput limits of most servers
/// without tripping their rate limiting.
pub const DEFAULT_WORKERS: usize = 48;

/// Default deadline for fetching one chunk.
pub const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration structure for the downloader
#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// Number of chunks fetched concurrently.
    pub workers: usize,
    /// Size of each ranged request, in bytes.
    pub chunk_size: u64,
    /// Deadline for a single chunk request, body included.
    pub chunk_timeout: Duration,
    /// Progress bar options.
    pub progress: ProgressBarOpts,
    /// Parent token; cancelling it aborts the download.
    pub cancellation: Option<CancellationToken>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_timeout: DEFAULT_CHUNK_TIMEOUT,
            progress: ProgressBarOpts::default(),
            cancellation: None,
        }
    }
}

//! Core downloader implementation with the chunked fetch logic.
//!
//! A download probes the resource once, plans fixed-size chunks and lets a
//! pool of workers fetch them concurrently through the shared
//! [`RangeReader`]. The first failing chunk cancels the others and becomes
//! the result of the whole download; nothing is retried.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splinter::downloader::DownloaderBuilder;
//! use splinter::http::{create_http_client, HttpClientConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(create_http_client(HttpClientConfig::default())?);
//! let downloader = DownloaderBuilder::new().workers(16).build();
//!
//! let content = downloader
//!     .download(transport.clone(), "https://example.com/archive.tar")
//!     .await?;
//! println!("{} bytes in memory", content.len());
//!
//! downloader
//!     .download_to_file(transport, "https://example.com/archive.tar", "archive.tar")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use super::group::{TaskGroup, TaskQueue};
use super::plan::{assemble, plan_chunks, plan_memory_chunks, ChunkSpan, MemoryChunk};
use crate::error::{Error, Result};
use crate::hash::verify_sha256;
use crate::http::Requester;
use crate::progress::ProgressDisplay;
use crate::reader::RangeReader;

use bytes::Bytes;
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Parallel chunked downloader.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use splinter::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

/// A fetched chunk on its way to the file writer.
#[derive(Debug)]
struct ChunkResult {
    offset: u64,
    content: Vec<u8>,
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the number of concurrent chunk workers.
    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Gets the size of each ranged request.
    pub fn chunk_size(&self) -> u64 {
        self.config.chunk_size
    }

    /// Gets the deadline of a single chunk request.
    pub fn chunk_timeout(&self) -> Duration {
        self.config.chunk_timeout
    }

    /// Downloads `url` into memory.
    pub async fn download(&self, transport: Arc<dyn Requester>, url: &str) -> Result<Bytes> {
        let reader = RangeReader::from_url(transport, url).await?;
        self.download_reader(Arc::new(reader)).await
    }

    /// Downloads `url` into memory and checks it against a hex SHA-256 digest.
    ///
    /// The digest is only checked once every chunk arrived.
    pub async fn download_with_checksum(
        &self,
        transport: Arc<dyn Requester>,
        url: &str,
        sha256_hex: &str,
    ) -> Result<Bytes> {
        let content = self.download(transport, url).await?;
        verify_sha256(&content, sha256_hex)?;
        Ok(content)
    }

    /// Downloads `url` straight into the file at `path`.
    ///
    /// The file is created or truncated. If the download fails the partial
    /// file is removed.
    pub async fn download_to_file(
        &self,
        transport: Arc<dyn Requester>,
        url: &str,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let reader = RangeReader::from_url(transport, url).await?;
        self.download_reader_to_file(Arc::new(reader), path).await
    }

    /// Fetches the whole resource behind an existing reader into memory.
    pub async fn download_reader(&self, reader: Arc<RangeReader>) -> Result<Bytes> {
        let total = reader.size().ok_or(Error::UnknownSize)?;
        let queue = Arc::new(TaskQueue::new(plan_memory_chunks(total, self.config.chunk_size)));
        debug!(
            url = %reader.url(),
            total,
            chunks = queue.len(),
            workers = self.config.workers,
            "Starting in-memory download"
        );

        let progress = ProgressDisplay::new(&self.config.progress, total);
        let mut group = TaskGroup::new(self.config.cancellation.as_ref());
        for _ in 0..self.config.workers.min(queue.len()) {
            group.spawn(memory_worker(
                reader.clone(),
                queue.clone(),
                group.token(),
                self.config.chunk_timeout,
                progress.clone(),
            ));
        }

        let chunks = group.wait().await.inspect_err(|_| progress.abandon())?;
        progress.finish();
        Ok(assemble(chunks.into_iter().flatten().collect()))
    }

    /// Fetches the whole resource behind an existing reader into `path`.
    pub async fn download_reader_to_file(
        &self,
        reader: Arc<RangeReader>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let path = path.as_ref();
        let total = reader.size().ok_or(Error::UnknownSize)?;

        debug!("Creating destination file {:?}", path);
        let file = File::create(path).await?;
        file.set_len(total).await?;

        let result = self.fetch_to_file(reader, file, total).await;
        if result.is_err() {
            if let Err(e) = fs::remove_file(path).await {
                warn!(path = ?path, error = %e, "Failed to remove partial download");
            }
        }
        result
    }

    async fn fetch_to_file(&self, reader: Arc<RangeReader>, file: File, total: u64) -> Result<()> {
        let queue = Arc::new(TaskQueue::new(plan_chunks(total, self.config.chunk_size)));
        debug!(
            url = %reader.url(),
            total,
            chunks = queue.len(),
            workers = self.config.workers,
            "Starting file download"
        );

        let progress = ProgressDisplay::new(&self.config.progress, total);
        let (sender, receiver) = mpsc::channel(self.config.workers);
        let mut group = TaskGroup::new(self.config.cancellation.as_ref());

        // Each member reports the number of bytes it wrote to disk.
        group.spawn(write_chunks(
            file,
            receiver,
            total,
            group.token(),
            progress.clone(),
        ));
        for _ in 0..self.config.workers.min(queue.len()) {
            let worker = file_worker(
                reader.clone(),
                queue.clone(),
                sender.clone(),
                group.token(),
                self.config.chunk_timeout,
            );
            group.spawn(async move { worker.await.map(|_| 0) });
        }
        drop(sender);

        let written: u64 = group
            .wait()
            .await
            .inspect_err(|_| progress.abandon())?
            .into_iter()
            .sum();
        if written != total {
            progress.abandon();
            return Err(Error::LengthMismatch {
                offset: 0,
                expected: total,
                actual: written,
            });
        }
        progress.finish();
        Ok(())
    }
}

/// Fills memory windows until the queue is empty or the group is cancelled.
async fn memory_worker(
    reader: Arc<RangeReader>,
    queue: Arc<TaskQueue<MemoryChunk>>,
    token: CancellationToken,
    timeout: Duration,
    progress: ProgressDisplay,
) -> Result<Vec<MemoryChunk>> {
    let mut done = Vec::new();
    while !token.is_cancelled() {
        let Some(mut chunk) = queue.pop() else {
            break;
        };
        tokio::select! {
            _ = token.cancelled() => break,
            read = read_chunk(&reader, timeout, chunk.offset, &mut chunk.content) => read?,
        }
        progress.advance(chunk.content.len() as u64);
        done.push(chunk);
    }
    Ok(done)
}

/// Fetches chunks into fresh buffers and hands them to the writer.
async fn file_worker(
    reader: Arc<RangeReader>,
    queue: Arc<TaskQueue<ChunkSpan>>,
    results: mpsc::Sender<ChunkResult>,
    token: CancellationToken,
    timeout: Duration,
) -> Result<()> {
    while !token.is_cancelled() {
        let Some(span) = queue.pop() else {
            break;
        };
        let mut content = vec![0u8; span.size as usize];
        tokio::select! {
            _ = token.cancelled() => break,
            read = read_chunk(&reader, timeout, span.offset, &mut content) => read?,
        }

        let result = ChunkResult {
            offset: span.offset,
            content,
        };
        tokio::select! {
            _ = token.cancelled() => break,
            sent = results.send(result) => {
                if sent.is_err() {
                    // The writer is gone, which only happens once the group is failing.
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Single owner of the destination file.
///
/// Writes each chunk at its offset and stops once `total` bytes are on disk.
async fn write_chunks(
    mut file: File,
    mut results: mpsc::Receiver<ChunkResult>,
    total: u64,
    token: CancellationToken,
    progress: ProgressDisplay,
) -> Result<u64> {
    let mut written = 0;
    while written < total {
        let next = tokio::select! {
            _ = token.cancelled() => return Ok(written),
            next = results.recv() => next,
        };
        let Some(chunk) = next else {
            debug!(written, total, "All workers stopped before the file was complete");
            return Ok(written);
        };

        file.seek(SeekFrom::Start(chunk.offset)).await?;
        file.write_all(&chunk.content).await?;
        written += chunk.content.len() as u64;
        progress.advance(chunk.content.len() as u64);
    }
    file.flush().await?;
    debug!(written, "Destination file complete");
    Ok(written)
}

/// Reads one whole chunk under its own deadline.
async fn read_chunk(
    reader: &RangeReader,
    timeout: Duration,
    offset: u64,
    buf: &mut [u8],
) -> Result<()> {
    let outcome = reader.with_timeout(timeout).read_at(buf, offset).await?;
    if outcome.bytes_read != buf.len() {
        return Err(Error::LengthMismatch {
            offset,
            expected: buf.len() as u64,
            actual: outcome.bytes_read as u64,
        });
    }
    Ok(())
}

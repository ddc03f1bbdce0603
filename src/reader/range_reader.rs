//! Random access over an HTTP resource through Range requests.
//!
//! A [`RangeReader`] is created from a request prototype. Construction makes a
//! one byte probe (`Range: bytes=0-0`) to confirm the server honours ranges and
//! to capture the resource's size and validators. Every later read re-checks
//! those validators, so a file replaced on the server mid-session is reported
//! as [`Error::ValidationFailed`] instead of silently mixing two versions.
//!
//! # Examples
//!
//! ```rust,no_run
//! use splinter::reader::RangeReader;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), splinter::Error> {
//! let reader = RangeReader::from_url(Arc::new(reqwest::Client::new()), "https://example.com/big.iso").await?;
//! let mut header = [0u8; 512];
//! let outcome = reader.read_at(&mut header, 32768).await?;
//! println!("read {} bytes, eof: {}", outcome.bytes_read, outcome.end_of_resource);
//! # Ok(())
//! # }
//! ```

use super::metadata::ResourceMetadata;
use crate::error::{Error, Result};
use crate::http::headers::{range_value, RANGE};
use crate::http::Requester;
use reqwest::{Method, Request, Response, StatusCode, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Result of a positioned read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Number of bytes written to the front of the buffer.
    pub bytes_read: usize,
    /// The read reached the last byte of the resource.
    pub end_of_resource: bool,
}

impl ReadOutcome {
    fn new(bytes_read: usize, end_of_resource: bool) -> Self {
        Self {
            bytes_read,
            end_of_resource,
        }
    }
}

/// Reader making HTTP Range requests against a single resource.
///
/// Safe for concurrent use: reads take `&self` and build their own request.
pub struct RangeReader {
    transport: Arc<dyn Requester>,
    prototype: Request,
    metadata: ResourceMetadata,
}

impl fmt::Debug for RangeReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeReader")
            .field("url", &self.prototype.url().as_str())
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl RangeReader {
    /// Creates a reader and probes the resource.
    ///
    /// The prototype must be a `GET` request; it is cloned for every request
    /// the reader makes and never sent itself.
    pub async fn new(transport: Arc<dyn Requester>, prototype: Request) -> Result<Self> {
        if prototype.method() != Method::GET {
            return Err(Error::InvalidRequest(format!(
                "invalid HTTP method {}, must be GET",
                prototype.method()
            )));
        }
        if prototype.try_clone().is_none() {
            return Err(Error::InvalidRequest(
                "request body cannot be cloned".into(),
            ));
        }

        let mut reader = RangeReader {
            transport,
            prototype,
            metadata: ResourceMetadata::default(),
        };
        reader.metadata = reader.probe().await?;
        Ok(reader)
    }

    /// Creates a reader for a plain `GET` of `url`.
    pub async fn from_url(transport: Arc<dyn Requester>, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        Self::new(transport, Request::new(Method::GET, url)).await
    }

    /// Total size of the resource, `None` if the server did not report it.
    pub fn size(&self) -> Option<u64> {
        self.metadata.size
    }

    pub fn content_type(&self) -> Option<&str> {
        self.metadata.content_type.as_deref()
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.metadata.last_modified.as_deref()
    }

    pub fn etag(&self) -> Option<&str> {
        self.metadata.etag.as_deref()
    }

    /// The snapshot taken by the probe.
    pub fn metadata(&self) -> &ResourceMetadata {
        &self.metadata
    }

    pub fn url(&self) -> &Url {
        self.prototype.url()
    }

    /// Derive a reader whose reads fail with [`Error::Timeout`] after `timeout`.
    ///
    /// The derived reader shares the cached metadata; no new probe is made.
    pub fn with_timeout(&self, timeout: Duration) -> ScopedReader<'_> {
        ScopedReader {
            reader: self,
            timeout,
        }
    }

    /// Reads `buf.len()` bytes starting at `offset`.
    ///
    /// Reads that run past the end of the resource are clamped and report
    /// `end_of_resource`; a read starting at or after the end returns zero
    /// bytes without contacting the server.
    pub async fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<ReadOutcome> {
        if buf.is_empty() {
            return Ok(ReadOutcome::new(0, false));
        }

        let first = offset;
        let wanted_last = offset.checked_add(buf.len() as u64 - 1);
        let mut clamped = false;
        let last = match self.metadata.size {
            Some(size) => {
                if first >= size {
                    return Ok(ReadOutcome::new(0, true));
                }
                // Some servers answer 416 when asked for bytes past the end.
                match wanted_last {
                    Some(last) if last < size => last,
                    _ => {
                        clamped = true;
                        size - 1
                    }
                }
            }
            None => wanted_last.ok_or_else(|| {
                Error::InvalidRequest(format!(
                    "read of {} bytes at offset {offset} runs past the last addressable byte",
                    buf.len()
                ))
            })?,
        };
        let buf = &mut buf[..(last - first + 1) as usize];

        let mut response = self.send_range(first, last).await?;
        if response.status() != StatusCode::PARTIAL_CONTENT {
            return Err(Error::RangeNotSupported {
                status: response.status(),
            });
        }

        let meta = ResourceMetadata::from_response(&response)?;
        if !self.metadata.same_resource(&meta) {
            debug!(
                url = %self.url(),
                expected = ?self.metadata,
                received = ?meta,
                "Resource changed since probe"
            );
            return Err(Error::ValidationFailed);
        }

        let (start, end) = match (meta.start, meta.end) {
            (Some(start), Some(end)) if start == first && end <= last && start <= end => {
                (start, end)
            }
            (start, end) => {
                return Err(Error::RangeMismatch {
                    first,
                    last,
                    received: format!("{start:?}-{end:?}"),
                })
            }
        };
        let reported = end - start + 1;
        if meta.content_length != Some(reported) {
            return Err(Error::LengthMismatch {
                offset: first,
                expected: reported,
                actual: meta.content_length.unwrap_or(0),
            });
        }

        let n = read_body(&mut response, buf).await?;
        if n == buf.len() {
            return Ok(ReadOutcome::new(n, clamped));
        }
        if n as u64 == reported {
            // The server sent a shorter, but self-consistent, range.
            return Ok(ReadOutcome::new(n, true));
        }
        Err(Error::IncompleteBody {
            offset: first,
            expected: reported,
            received: n as u64,
        })
    }

    async fn probe(&self) -> Result<ResourceMetadata> {
        let mut response = self.send_range(0, 0).await?;
        if response.status() != StatusCode::PARTIAL_CONTENT {
            return Err(Error::RangeNotSupported {
                status: response.status(),
            });
        }
        let meta = ResourceMetadata::from_response(&response)?;
        while response.chunk().await?.is_some() {}

        debug!(
            url = %self.url(),
            size = ?meta.size,
            etag = ?meta.etag,
            "Probed resource"
        );
        Ok(meta)
    }

    async fn send_range(&self, first: u64, last: u64) -> Result<Response> {
        let mut request = self
            .prototype
            .try_clone()
            .ok_or_else(|| Error::InvalidRequest("request body cannot be cloned".into()))?;
        request.headers_mut().insert(RANGE, range_value(first, last)?);
        self.transport.execute(request).await
    }
}

/// A [`RangeReader`] bound to a per-read deadline.
#[derive(Debug, Clone, Copy)]
pub struct ScopedReader<'a> {
    reader: &'a RangeReader,
    timeout: Duration,
}

impl ScopedReader<'_> {
    /// Same as [`RangeReader::read_at`], bounded by the scope's deadline.
    pub async fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<ReadOutcome> {
        tokio::time::timeout(self.timeout, self.reader.read_at(buf, offset))
            .await
            .map_err(|_| Error::Timeout {
                offset,
                timeout: self.timeout,
            })?
    }

    pub fn size(&self) -> Option<u64> {
        self.reader.size()
    }
}

/// Copy the body into `buf` until it is full or the body ends.
async fn read_body(response: &mut Response, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let take = chunk.len().min(buf.len() - filled);
        buf[filled..filled + take].copy_from_slice(&chunk[..take]);
        filled += take;
    }
    Ok(filled)
}

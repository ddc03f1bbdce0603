//! Error handling for the Splinter library.
//!
//! Every fallible operation in the crate returns [`Error`]. Chunked downloads
//! surface exactly one of these: the first failure observed by any worker.

use reqwest::StatusCode;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can happen when using Splinter.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// This variant captures internal errors that don't fit into other categories,
    /// such as a worker task that panicked.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request prototype given to a reader cannot be used.
    ///
    /// Only `GET` requests without a streaming body are accepted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The server answered a ranged request with something other than
    /// `206 Partial Content`.
    #[error("server does not support range requests (status {status})")]
    RangeNotSupported { status: StatusCode },

    /// A `Content-Range` header value could not be parsed.
    #[error("content-range parse error: {0:?}")]
    ContentRange(String),

    /// The resource changed between the probe and a later read.
    ///
    /// Detected through the size, `Last-Modified` and `ETag` of each response.
    #[error("validation failed: the remote resource changed")]
    ValidationFailed,

    /// The server returned a different range than the one requested.
    #[error("received different range than requested (req={first}-{last}, resp={received})")]
    RangeMismatch {
        first: u64,
        last: u64,
        received: String,
    },

    /// A length reported by the server or read from it disagrees with the
    /// expected length.
    #[error("length mismatch at offset {offset}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        offset: u64,
        expected: u64,
        actual: u64,
    },

    /// The response body ended before the reported range was delivered.
    #[error("response body ended early at offset {offset}: expected {expected} bytes, got {received}")]
    IncompleteBody {
        offset: u64,
        expected: u64,
        received: u64,
    },

    /// A chunk read did not finish within its deadline.
    #[error("chunk at offset {offset} timed out after {timeout:?}")]
    Timeout { offset: u64, timeout: Duration },

    /// The downloaded content does not hash to the expected digest.
    #[error("sha256 checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The expected digest is not a valid hex string.
    #[error("invalid checksum {0:?}")]
    InvalidChecksum(String),

    /// The server never reported the total size of the resource.
    #[error("the size of the remote resource is unknown")]
    UnknownSize,

    /// The download was cancelled from outside before it completed.
    #[error("download cancelled")]
    Cancelled,

    /// Error while reading a remote archive.
    #[error("Archive error: {message}")]
    Archive {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Archive member compressed with a method we cannot inflate.
    #[error("Unsupported compression method: {0}")]
    UnsupportedCompression(u16),

    /// I/O Error.
    ///
    /// This variant wraps standard I/O errors that can occur while writing
    /// the destination file.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    ///
    /// Network failures and body streaming errors end up here.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the middleware stack of the default transport.
    #[error("Middleware Error")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Shorthand for an [`Error::Archive`] without an underlying cause.
    pub(crate) fn archive(message: impl Into<String>) -> Self {
        Error::Archive {
            message: message.into(),
            cause: None,
        }
    }
}

/// Result type alias for operations that can fail with a Splinter error.
pub type Result<T> = std::result::Result<T, Error>;

//! Header names and formatting used on the wire.

use crate::error::{Error, Result};
use reqwest::header::HeaderValue;

pub const RANGE: &str = "Range";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_RANGE: &str = "Content-Range";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const LAST_MODIFIED: &str = "Last-Modified";
pub const ETAG: &str = "ETag";

/// Format an inclusive byte range as a `Range` header value.
///
/// ```rust
/// use splinter::http::headers::range_value;
///
/// assert_eq!(range_value(0, 0).unwrap(), "bytes=0-0");
/// assert_eq!(range_value(65536, 131071).unwrap(), "bytes=65536-131071");
/// ```
pub fn range_value(first: u64, last: u64) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("bytes={first}-{last}"))
        .map_err(|e| Error::Internal(format!("invalid range header: {e}")))
}

//! Identity snapshot of a remote resource.

use crate::error::Result;
use crate::http::headers::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use crate::utils::parse_content_range;
use reqwest::{header::HeaderMap, Response, StatusCode};

/// Size and validators of a resource as reported by one response.
///
/// `start` and `end` only carry values for `206 Partial Content` responses
/// that include a `Content-Range` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub start: Option<u64>,
    pub end: Option<u64>,
    /// Total size of the resource, `None` when the server never said.
    pub size: Option<u64>,
    /// Length of this particular response body.
    pub content_length: Option<u64>,
    pub last_modified: Option<String>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

impl ResourceMetadata {
    /// Extract metadata from a response's status and headers.
    pub fn from_response(response: &Response) -> Result<Self> {
        let content_length =
            header_u64(response.headers(), CONTENT_LENGTH).or_else(|| response.content_length());
        Self::from_parts(response.status(), response.headers(), content_length)
    }

    pub(crate) fn from_parts(
        status: StatusCode,
        headers: &HeaderMap,
        content_length: Option<u64>,
    ) -> Result<Self> {
        let mut meta = ResourceMetadata {
            content_length,
            last_modified: header_string(headers, LAST_MODIFIED),
            etag: header_string(headers, ETAG),
            content_type: header_string(headers, CONTENT_TYPE),
            ..Default::default()
        };

        match status {
            StatusCode::OK => meta.size = content_length,
            StatusCode::PARTIAL_CONTENT => {
                if let Some(value) = header_string(headers, CONTENT_RANGE) {
                    let content_range = parse_content_range(&value)?;
                    meta.start = content_range.first();
                    meta.end = content_range.last();
                    meta.size = content_range.length;
                }
            }
            _ => {}
        }
        Ok(meta)
    }

    /// Whether `other` describes the same version of the resource.
    ///
    /// Compares the total size, `Last-Modified` and `ETag`.
    pub fn same_resource(&self, other: &ResourceMetadata) -> bool {
        self.size == other.size
            && self.last_modified == other.last_modified
            && self.etag == other.etag
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_partial_content_metadata() {
        let h = headers(&[
            ("Content-Range", "bytes 0-0/2048"),
            ("ETag", "\"abc\""),
            ("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
            ("Content-Type", "application/zip"),
        ]);
        let meta = ResourceMetadata::from_parts(StatusCode::PARTIAL_CONTENT, &h, Some(1)).unwrap();
        assert_eq!(meta.start, Some(0));
        assert_eq!(meta.end, Some(0));
        assert_eq!(meta.size, Some(2048));
        assert_eq!(meta.content_length, Some(1));
        assert_eq!(meta.etag.as_deref(), Some("\"abc\""));
        assert_eq!(meta.content_type.as_deref(), Some("application/zip"));
    }

    #[test]
    fn test_partial_content_without_content_range_has_unknown_size() {
        let meta =
            ResourceMetadata::from_parts(StatusCode::PARTIAL_CONTENT, &HeaderMap::new(), Some(1))
                .unwrap();
        assert_eq!(meta.start, None);
        assert_eq!(meta.size, None);
    }

    #[test]
    fn test_ok_uses_content_length_as_size() {
        let meta = ResourceMetadata::from_parts(StatusCode::OK, &HeaderMap::new(), Some(512)).unwrap();
        assert_eq!(meta.size, Some(512));
        assert_eq!(meta.start, None);
    }

    #[test]
    fn test_bad_content_range_is_an_error() {
        let h = headers(&[("Content-Range", "bytes nope")]);
        let err = ResourceMetadata::from_parts(StatusCode::PARTIAL_CONTENT, &h, None).unwrap_err();
        assert!(matches!(err, Error::ContentRange(_)));
    }

    #[test]
    fn test_same_resource_ignores_range_and_content_type() {
        let a = ResourceMetadata {
            start: Some(0),
            end: Some(0),
            size: Some(10),
            etag: Some("v1".into()),
            content_type: Some("text/plain".into()),
            ..Default::default()
        };
        let mut b = ResourceMetadata {
            start: Some(4),
            end: Some(9),
            size: Some(10),
            etag: Some("v1".into()),
            ..Default::default()
        };
        assert!(a.same_resource(&b));

        b.etag = Some("v2".into());
        assert!(!a.same_resource(&b));
    }
}

//! In-process transport used by unit tests.

use crate::error::{Error, Result};
use crate::http::Requester;
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type Handler = dyn Fn(&Request, usize) -> Result<http::Response<Vec<u8>>> + Send + Sync;

/// Answers each request with a closure, counting calls.
pub(crate) struct MockRequester {
    handler: Box<Handler>,
    calls: AtomicUsize,
    ranges: Mutex<Vec<String>>,
}

impl MockRequester {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: Fn(&Request, usize) -> Result<http::Response<Vec<u8>>> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            ranges: Mutex::new(Vec::new()),
        }
    }

    /// Serve `content` honouring the `Range` header, with a fixed ETag.
    pub(crate) fn serving(content: Vec<u8>) -> Self {
        Self::new(move |req, _| Ok(range_response(&content, req, "\"v1\"")))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn ranges(&self) -> Vec<String> {
        self.ranges.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Requester for MockRequester {
    async fn execute(&self, request: Request) -> Result<Response> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(range) = request_range(&request) {
            if let Ok(mut ranges) = self.ranges.lock() {
                ranges.push(range);
            }
        }
        let response = (self.handler)(&request, call)?;
        Ok(Response::from(response))
    }
}

pub(crate) fn request_range(request: &Request) -> Option<String> {
    request
        .headers()
        .get("Range")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Parse `bytes=F-L` from the request.
pub(crate) fn requested_bounds(request: &Request) -> Option<(u64, u64)> {
    let range = request_range(request)?;
    let (first, last) = range.strip_prefix("bytes=")?.split_once('-')?;
    Some((first.parse().ok()?, last.parse().ok()?))
}

/// A well-behaved 206 answer for the requested slice of `content`.
pub(crate) fn range_response(
    content: &[u8],
    request: &Request,
    etag: &str,
) -> http::Response<Vec<u8>> {
    let Some((first, last)) = requested_bounds(request) else {
        return http::Response::builder()
            .status(200)
            .header("Content-Length", content.len())
            .body(content.to_vec())
            .unwrap();
    };
    let total = content.len() as u64;
    if first >= total {
        return http::Response::builder()
            .status(416)
            .header("Content-Range", format!("bytes */{total}"))
            .body(Vec::new())
            .unwrap();
    }
    let last = last.min(total - 1);
    let body = content[first as usize..=last as usize].to_vec();
    http::Response::builder()
        .status(206)
        .header("Content-Range", format!("bytes {first}-{last}/{total}"))
        .header("Content-Length", body.len())
        .header("ETag", etag)
        .body(body)
        .unwrap()
}

pub(crate) fn transport_error(message: &str) -> Error {
    Error::Internal(message.to_string())
}

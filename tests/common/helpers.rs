#![allow(dead_code)]

use rand::Rng;
use splinter::Requester;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// Common test constants
pub const TEST_PATH: &str = "/blob.bin";
pub const TEST_ETAG: &str = "\"blob-v1\"";
pub const TEST_LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";

/// Installs a test-friendly subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates random test content of the given size
pub fn create_test_content(size: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    (0..size).map(|_| rng.random::<u8>()).collect()
}

/// The transport the tests hand to readers and downloaders.
pub fn create_transport() -> Arc<dyn Requester> {
    Arc::new(reqwest::Client::new())
}

/// Serves byte ranges of a fixed body the way a static file server would.
#[derive(Clone)]
pub struct RangeResponder {
    content: Arc<Vec<u8>>,
    etag: String,
    /// ETag served for chunks starting at or after the given offset.
    etag_after: Option<(u64, String)>,
    /// Delay applied to every request except the probe.
    chunk_delay: Option<Duration>,
}

impl RangeResponder {
    pub fn new(content: Vec<u8>) -> Self {
        Self {
            content: Arc::new(content),
            etag: TEST_ETAG.to_string(),
            etag_after: None,
            chunk_delay: None,
        }
    }

    /// Pretend the file is replaced for reads from `offset` on.
    pub fn replaced_after(mut self, offset: u64, etag: &str) -> Self {
        self.etag_after = Some((offset, etag.to_string()));
        self
    }

    pub fn slow_chunks(mut self, delay: Duration) -> Self {
        self.chunk_delay = Some(delay);
        self
    }
}

impl Respond for RangeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let total = self.content.len() as u64;
        let Some((first, last)) = request
            .headers
            .get("range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_range)
        else {
            return ResponseTemplate::new(200).set_body_bytes(self.content.to_vec());
        };

        if first >= total {
            return ResponseTemplate::new(416)
                .insert_header("Content-Range", format!("bytes */{total}").as_str());
        }
        let last = last.min(total - 1);
        let etag = match &self.etag_after {
            Some((offset, etag)) if first >= *offset && first > 0 => etag.as_str(),
            _ => self.etag.as_str(),
        };

        let mut template = ResponseTemplate::new(206)
            .insert_header("Content-Range", format!("bytes {first}-{last}/{total}").as_str())
            .insert_header("ETag", etag)
            .insert_header("Last-Modified", TEST_LAST_MODIFIED)
            .insert_header("Content-Type", "application/octet-stream")
            .set_body_bytes(self.content[first as usize..=last as usize].to_vec());
        if let Some(delay) = self.chunk_delay {
            if (first, last) != (0, 0) {
                template = template.set_delay(delay);
            }
        }
        template
    }
}

fn parse_range(value: &str) -> Option<(u64, u64)> {
    let (first, last) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((first.parse().ok()?, last.parse().ok()?))
}

/// Starts a server answering `GET /blob.bin` with `responder`.
pub async fn start_range_server(responder: RangeResponder) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TEST_PATH))
        .respond_with(responder)
        .mount(&server)
        .await;
    server
}

/// Starts a server that ignores `Range` and always sends the whole body.
pub async fn start_plain_server(content: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .mount(&server)
        .await;
    server
}

pub fn blob_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), TEST_PATH)
}

/// Number of requests that carried a `Range` header other than the probe's.
pub async fn chunk_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| {
            r.headers
                .get("range")
                .is_some_and(|v| v.as_bytes() != b"bytes=0-0")
        })
        .count()
}

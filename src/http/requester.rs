//! The request-execution capability the reader is built on.
//!
//! Anything that can turn a [`Request`] into a [`Response`] can back a
//! [`RangeReader`](crate::reader::RangeReader): a plain `reqwest` client, the
//! middleware client from [`create_http_client`](super::create_http_client),
//! or an in-process mock in tests.

use crate::error::Result;
use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::ClientWithMiddleware;

/// Executes a fully-formed request and returns the raw response.
///
/// Implementations must not interpret the status code; the reader does that.
#[async_trait]
pub trait Requester: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl Requester for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response> {
        Ok(reqwest::Client::execute(self, request).await?)
    }
}

#[async_trait]
impl Requester for ClientWithMiddleware {
    async fn execute(&self, request: Request) -> Result<Response> {
        Ok(ClientWithMiddleware::execute(self, request).await?)
    }
}

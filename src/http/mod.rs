//! HTTP plumbing: the transport abstraction, the default client and the
//! header names the reader speaks.
//!
//! - [`requester`] - the [`Requester`] trait every transport implements
//! - [`client`] - building the default middleware client
//! - [`headers`] - header names and `Range` value formatting
//!
//! # Examples
//!
//! ```rust
//! use splinter::http::{create_http_client, HttpClientConfig, Requester};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let transport: Arc<dyn Requester> = Arc::new(client);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod headers;
pub mod requester;

pub use client::{create_http_client, HttpClientConfig};
pub use requester::Requester;

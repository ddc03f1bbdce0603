//! Splinter reads remote files through HTTP Range requests.
//!
//! A [`RangeReader`] turns an HTTP resource into a seekable byte source, and
//! the [`Downloader`] uses it to fetch a whole resource in parallel chunks,
//! either into memory or straight into a file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use splinter::{http::create_http_client, HttpClientConfig, Error};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let transport = Arc::new(create_http_client(HttpClientConfig::default())?);
//! let url = "https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip";
//! let content = splinter::download(transport, url).await?;
//! println!("{} bytes", content.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`reader`] - [`RangeReader`] and the resource metadata it validates against
//! - [`downloader`] - The [`Downloader`], its builder and the chunk planner
//! - [`hash`] - SHA-256 verification of downloaded content
//! - [`archive`] - Extracting single members of remote ZIP archives
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - The transport abstraction and the default HTTP client
//! - [`progress`] - Progress bar options
//! - [`utils`] - `Content-Range` parsing

pub mod archive;
pub mod downloader;
pub mod error;
pub mod hash;
pub mod http;
pub mod progress;
pub mod reader;
pub mod utils;

pub use archive::{ZipExtractor, ZipFileInfo};
pub use downloader::{
    download, download_to_file, download_with_checksum, Downloader, DownloaderBuilder,
};
pub use error::{Error, Result};
pub use hash::{sha256_hex, verify_sha256};
pub use http::{create_http_client, HttpClientConfig, Requester};
pub use progress::ProgressBarOpts;
pub use reader::{RangeReader, ReadOutcome, ResourceMetadata};
pub use utils::{parse_content_range, ContentRange};

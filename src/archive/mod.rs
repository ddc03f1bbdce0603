//! Remote archive access built on [`RangeReader`](crate::reader::RangeReader).
//!
//! ```rust,no_run
//! use splinter::archive::ZipExtractor;
//! use splinter::reader::RangeReader;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), splinter::Error> {
//! let reader = RangeReader::from_url(Arc::new(reqwest::Client::new()), "https://example.com/a.zip").await?;
//! let zip = ZipExtractor::new(&reader)?;
//! let readme = zip.extract_file("README.md").await?;
//! # Ok(())
//! # }
//! ```

pub mod zip;

pub use zip::{ZipExtractor, ZipFileInfo};

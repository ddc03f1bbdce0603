//! Random-access reading of remote resources.
//!
//! - [`range_reader`] - [`RangeReader`], positioned reads over HTTP Range requests
//! - [`metadata`] - [`ResourceMetadata`], the identity snapshot each read is checked against

pub mod metadata;
pub mod range_reader;

#[cfg(test)]
pub(crate) mod testing;

pub use metadata::ResourceMetadata;
pub use range_reader::{RangeReader, ReadOutcome, ScopedReader};

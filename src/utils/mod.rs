//! Shared utility functions.
//!
//! - [`content_range`] - `Content-Range` header parsing

pub mod content_range;

pub use content_range::{parse_content_range, ContentRange};

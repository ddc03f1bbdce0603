//! `Content-Range` header parsing.
//!
//! Supported forms:
//!
//! - `bytes 42-1233/1234`
//! - `bytes 42-1233/*`
//! - `bytes */1234`

use crate::error::{Error, Result};

/// A parsed `Content-Range` value. `None` stands for `*` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// Inclusive `(first, last)` byte positions.
    pub range: Option<(u64, u64)>,
    /// Complete length of the representation.
    pub length: Option<u64>,
}

impl ContentRange {
    pub fn first(&self) -> Option<u64> {
        self.range.map(|(first, _)| first)
    }

    pub fn last(&self) -> Option<u64> {
        self.range.map(|(_, last)| last)
    }
}

/// Parse a `Content-Range` header value.
///
/// # Example
///
/// ```rust
/// use splinter::utils::parse_content_range;
///
/// let cr = parse_content_range("bytes 42-1233/1234").unwrap();
/// assert_eq!(cr.range, Some((42, 1233)));
/// assert_eq!(cr.length, Some(1234));
///
/// assert!(parse_content_range("bytes 42-1233").is_err());
/// ```
pub fn parse_content_range(value: &str) -> Result<ContentRange> {
    let fail = || Error::ContentRange(value.to_string());

    let (unit, spec) = split_pair(value, ' ').ok_or_else(fail)?;
    if unit != "bytes" {
        return Err(fail());
    }
    let (range, length) = split_pair(spec, '/').ok_or_else(fail)?;

    let length = match length {
        "*" => None,
        n => Some(n.parse::<u64>().map_err(|_| fail())?),
    };

    let range = match range {
        "*" => None,
        r => {
            let (first, last) = split_pair(r, '-').ok_or_else(fail)?;
            let first = first.parse::<u64>().map_err(|_| fail())?;
            let last = last.parse::<u64>().map_err(|_| fail())?;
            Some((first, last))
        }
    };

    if range.is_none() && length.is_none() {
        return Err(fail());
    }
    Ok(ContentRange { range, length })
}

/// Split into exactly two parts on `sep`; more or fewer parts is malformed.
fn split_pair(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut parts = s.split(sep);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Some((a, b)),
        _ => None,
    }
}

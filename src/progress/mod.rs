//! Progress reporting for chunked downloads.
//!
//! - `style` - [`ProgressBarOpts`], how the bar looks and whether it shows
//! - `display` - [`ProgressDisplay`], the bar the workers advance
//!
//! # Examples
//!
//! ```rust
//! use splinter::downloader::DownloaderBuilder;
//! use splinter::progress::ProgressBarOpts;
//!
//! let downloader = DownloaderBuilder::new()
//!     .progress(ProgressBarOpts::hidden())
//!     .build();
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::ProgressBarOpts;

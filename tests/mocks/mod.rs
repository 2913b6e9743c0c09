//! Mock implementations of the extraction tool
//!
//! Lets pipeline tests run without yt-dlp or network access.

pub mod mock_extractor;

#[allow(unused_imports)]
pub use mock_extractor::{MockExtractor, MockOutcome};

//! Extraction backend abstraction.
//!
//! The bot never parses sites or transcodes media itself; an [`Extractor`]
//! does both and reports progress back over a channel.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::error::AppResult;
use crate::download::progress::ProgressEvent;

/// Request parameters for one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Source URL, passed to the tool verbatim
    pub url: String,
    /// Directory the tool writes its output into
    pub output_dir: PathBuf,
}

/// External media extraction tool.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Human-readable name of this backend (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Download and convert `request.url` into `request.output_dir`.
    ///
    /// Progress is sent through `progress_tx` while the tool runs; the sender
    /// is dropped once the tool exits. Returns the path of the deliverable
    /// file.
    async fn extract(
        &self,
        request: &ExtractRequest,
        progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    ) -> AppResult<PathBuf>;
}

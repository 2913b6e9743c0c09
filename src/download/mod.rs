//! Download management and processing

pub mod job;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod ytdlp;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use job::{DownloadJob, JobWorkspace};
pub use pipeline::{handle_url, JobOutcome, JobSettings};
pub use progress::{ProgressEvent, ProgressStatus, ProgressTracker};
pub use source::{ExtractRequest, Extractor};
pub use ytdlp::YtDlpExtractor;

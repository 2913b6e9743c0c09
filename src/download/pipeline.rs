//! Job orchestration: one URL in, one document (or one notice) out.
//!
//! [`handle_url`] runs a whole job: status message, extraction with live
//! progress, size check, delivery, and cleanup on every exit path.

use std::path::PathBuf;

use teloxide::types::MessageId;
use tokio::sync::mpsc;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::utils::format_size_mb;
use crate::download::job::DownloadJob;
use crate::download::progress::{status_text, ProgressEvent, ProgressTracker};
use crate::download::source::{ExtractRequest, Extractor};
use crate::telegram::status::report_status;
use crate::telegram::transport::ChatTransport;

/// Sent instead of the file when it is over the size limit
pub const OVERSIZE_NOTICE: &str = "⚠️ Video too large (>2GB) to send on Telegram.";

/// Caption of the delivered document.
pub fn completion_caption(size_bytes: u64) -> String {
    format!("✅ Download completed! ({} MB)", format_size_mb(size_bytes))
}

/// Message shown when a job fails.
pub fn failure_notice(err: &AppError) -> String {
    format!("❌ Failed to download.\nError: {}", err)
}

/// Knobs shared by all jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSettings {
    /// Root under which per-job directories are created
    pub download_dir: PathBuf,
    /// Files strictly larger than this are not sent
    pub max_file_size: u64,
}

impl JobSettings {
    pub fn from_config() -> Self {
        Self {
            download_dir: config::DOWNLOAD_FOLDER.clone(),
            max_file_size: config::limits::MAX_FILE_SIZE,
        }
    }
}

/// What the user ended up receiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Document sent with its caption
    Delivered { size: u64 },
    /// Oversize notice sent, no document
    Oversize { size: u64 },
    /// Failure notice sent
    Failed { error: String },
}

/// Handles one inbound URL end to end.
///
/// Exactly one of {document, oversize notice, failure notice} is sent, and
/// the downloaded file and status message are gone when this returns. Only
/// an error sending the initial status message is returned as `Err`; at that
/// point nothing has been created yet.
pub async fn handle_url<T, E>(transport: &T, extractor: &E, settings: &JobSettings, url: &str) -> AppResult<JobOutcome>
where
    T: ChatTransport + ?Sized,
    E: Extractor + ?Sized,
{
    let status_message = transport.send_text(&status_text(0)).await?;
    let mut job = DownloadJob::new(url, status_message, &settings.download_dir);
    log::info!("Job {} started via {} for {}", job.id, extractor.name(), url);

    let outcome = match run_job(transport, extractor, settings, &mut job).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Job {} failed: {}", job.id, e);
            if let Err(send_err) = transport.send_text(&failure_notice(&e)).await {
                log::error!("Job {}: failed to send failure notice: {}", job.id, send_err);
            }
            JobOutcome::Failed { error: e.to_string() }
        }
    };

    job.release_files().await;
    if let Err(e) = transport.delete_message(job.status_message).await {
        log::warn!("Job {}: failed to delete status message: {}", job.id, e);
    }

    log::info!("Job {} finished: {:?}", job.id, outcome);
    Ok(outcome)
}

/// The protected part of a job. Any error here becomes a failure notice.
async fn run_job<T, E>(
    transport: &T,
    extractor: &E,
    settings: &JobSettings,
    job: &mut DownloadJob,
) -> AppResult<JobOutcome>
where
    T: ChatTransport + ?Sized,
    E: Extractor + ?Sized,
{
    job.workspace().prepare().await?;
    let request = ExtractRequest {
        url: job.source_url.clone(),
        output_dir: job.workspace().path().to_path_buf(),
    };

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let (extracted, ()) = tokio::join!(
        extractor.extract(&request, progress_tx),
        relay_progress(transport, job.status_message, &mut job.tracker, progress_rx),
    );
    let path = extracted?;
    job.target_path = Some(path.clone());

    let size = fs_err::tokio::metadata(&path).await?.len();
    if size > settings.max_file_size {
        log::warn!(
            "Job {}: {} is {} bytes, over the {} byte limit",
            job.id,
            path.display(),
            size,
            settings.max_file_size
        );
        transport.send_text(OVERSIZE_NOTICE).await?;
        return Ok(JobOutcome::Oversize { size });
    }

    transport.send_document(&path, &completion_caption(size)).await?;
    Ok(JobOutcome::Delivered { size })
}

/// Drains progress events until the extractor drops its sender.
///
/// Edits are awaited one at a time, so they reach the chat in the order
/// they were produced. A failed edit is logged and does not stop the job.
async fn relay_progress<T>(
    transport: &T,
    status_message: MessageId,
    tracker: &mut ProgressTracker,
    mut progress_rx: mpsc::UnboundedReceiver<ProgressEvent>,
) where
    T: ChatTransport + ?Sized,
{
    while let Some(event) = progress_rx.recv().await {
        let Some(percent) = tracker.on_event(&event) else {
            continue;
        };
        log::debug!("Progress {}% for status message {}", percent, status_message.0);
        if let Err(e) = report_status(transport, status_message, &status_text(percent)).await {
            log::warn!("Failed to update progress message: {}", e);
        }
    }
}

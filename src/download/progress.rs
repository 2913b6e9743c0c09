//! Download progress events and throttling
//!
//! yt-dlp reports progress many times per second. [`ProgressTracker`] reduces
//! that stream to at most one report per 10% step so the status message is
//! edited a handful of times per job.

use serde::{Deserialize, Deserializer};

/// Stage reported by the extraction tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Downloading,
    Finished,
    #[serde(other)]
    Other,
}

/// One progress report from the extraction tool.
///
/// Deserializes straight from yt-dlp's progress dictionary (`%(progress)j`).
/// Byte counters may be fractional there (`total_bytes_estimate` usually is),
/// so they are truncated to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    #[serde(default, deserialize_with = "de_bytes")]
    pub downloaded_bytes: u64,
    #[serde(default, deserialize_with = "de_opt_bytes")]
    pub total_bytes: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_bytes")]
    pub total_bytes_estimate: Option<u64>,
}

impl ProgressEvent {
    /// A `downloading` event with an exact total.
    pub fn downloading(downloaded_bytes: u64, total_bytes: Option<u64>) -> Self {
        Self {
            status: ProgressStatus::Downloading,
            downloaded_bytes,
            total_bytes,
            total_bytes_estimate: None,
        }
    }

    /// Exact total if known, else the estimate. Zero counts as unknown.
    pub fn resolved_total(&self) -> Option<u64> {
        self.total_bytes
            .filter(|total| *total > 0)
            .or(self.total_bytes_estimate.filter(|total| *total > 0))
    }
}

fn bytes_from_f64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

fn de_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.map(bytes_from_f64).unwrap_or(0))
}

fn de_opt_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.map(bytes_from_f64))
}

/// Whole percent of `downloaded` out of `total`, capped at 100.
///
/// `total` must be non-zero.
pub fn percent_of(downloaded: u64, total: u64) -> u8 {
    let percent = (u128::from(downloaded) * 100) / u128::from(total);
    percent.min(100) as u8
}

/// Turns raw progress events into coarse 10%-step reports.
///
/// Only suppresses repeats of the last reported value; it does not force
/// progress to be monotonic.
#[derive(Debug, Default, Clone)]
pub struct ProgressTracker {
    last_reported: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last percent handed out by [`on_event`](Self::on_event), if any.
    pub fn last_reported(&self) -> Option<u8> {
        self.last_reported
    }

    /// Returns the percent to display, or `None` when this event should not
    /// produce a status update.
    pub fn on_event(&mut self, event: &ProgressEvent) -> Option<u8> {
        if event.status != ProgressStatus::Downloading {
            return None;
        }
        let total = event.resolved_total()?;
        let percent = percent_of(event.downloaded_bytes, total);

        if percent % 10 != 0 || self.last_reported == Some(percent) {
            return None;
        }
        self.last_reported = Some(percent);
        Some(percent)
    }
}

/// Status message text for a given percent.
pub fn status_text(percent: u8) -> String {
    format!("⬇️ Downloading... {}%", percent)
}

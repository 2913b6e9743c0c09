//! Scripted extractor
//!
//! Replays a fixed list of progress events, then either writes a file of the
//! requested size into the job directory or fails like yt-dlp would.
//!
//! Like yt-dlp, it reports the name the download had before recoding; the
//! deliverable is resolved through `final_output_path`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use vidrelay::download::ytdlp::final_output_path;
use vidrelay::download::{ExtractRequest, Extractor, ProgressEvent};
use vidrelay::{AppError, AppResult};

/// How the scripted extraction ends
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Reports `file_name` and writes its `.mp4` counterpart with `size` bytes.
    /// The file is sparse, so large sizes are cheap. With `keep_original`, the
    /// reported file is left next to it too (1 byte), as an aborted recode would.
    File {
        file_name: String,
        size: u64,
        keep_original: bool,
    },
    /// Fails with this message, before producing any file
    Fail(String),
}

pub struct MockExtractor {
    events: Vec<ProgressEvent>,
    outcome: MockOutcome,
    last_output_dir: Mutex<Option<PathBuf>>,
}

impl MockExtractor {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            events: Vec::new(),
            outcome,
            last_output_dir: Mutex::new(None),
        }
    }

    /// Succeeds with an MP4 of `size` bytes, reported as a `.webm` download.
    pub fn file(size: u64) -> Self {
        Self::new(MockOutcome::File {
            file_name: "Some_Video.webm".to_string(),
            size,
            keep_original: false,
        })
    }

    /// Like [`file`](Self::file), but the pre-recode `.webm` stays on disk.
    pub fn file_with_original(size: u64) -> Self {
        Self::new(MockOutcome::File {
            file_name: "Some_Video.webm".to_string(),
            size,
            keep_original: true,
        })
    }

    pub fn failing(message: &str) -> Self {
        Self::new(MockOutcome::Fail(message.to_string()))
    }

    pub fn with_events(mut self, events: Vec<ProgressEvent>) -> Self {
        self.events = events;
        self
    }

    /// Directory of the last job this extractor was asked to fill.
    pub fn last_output_dir(&self) -> Option<PathBuf> {
        self.last_output_dir.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(
        &self,
        request: &ExtractRequest,
        progress: mpsc::UnboundedSender<ProgressEvent>,
    ) -> AppResult<PathBuf> {
        *self.last_output_dir.lock().unwrap() = Some(request.output_dir.clone());

        for event in &self.events {
            let _ = progress.send(event.clone());
        }

        match &self.outcome {
            MockOutcome::Fail(message) => Err(AppError::Extraction(message.clone())),
            MockOutcome::File {
                file_name,
                size,
                keep_original,
            } => {
                let reported = request.output_dir.join(file_name);
                if *keep_original {
                    std::fs::write(&reported, b"x")?;
                }
                let path = final_output_path(&reported);
                let file = std::fs::File::create(&path)?;
                file.set_len(*size)?;
                Ok(path)
            }
        }
    }
}

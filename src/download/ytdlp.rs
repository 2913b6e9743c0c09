//! yt-dlp backend
//!
//! Runs yt-dlp as a child process on a blocking worker and reads its output
//! line by line. Progress arrives as JSON through `--progress-template`; the
//! final file path through `--print after_move:...`. Both are tagged with a
//! marker so they can't be confused with ordinary tool output.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc as std_mpsc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::download::progress::ProgressEvent;
use crate::download::source::{ExtractRequest, Extractor};
use crate::download::ytdlp_errors::describe_failure;

/// Prefix of progress lines produced by our `--progress-template`
pub const PROGRESS_MARKER: &str = "vidrelay-progress ";

/// Prefix of the line produced by our `--print after_move:` directive
pub const FILE_MARKER: &str = "vidrelay-file ";

/// How many stderr lines are kept for error reporting
const STDERR_TAIL_LINES: usize = 200;

/// A classified line of yt-dlp output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Progress(ProgressEvent),
    File(PathBuf),
    Other,
}

/// Classifies one line of yt-dlp stdout/stderr.
pub fn parse_output_line(line: &str) -> OutputLine {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(json) = line.strip_prefix(PROGRESS_MARKER) {
        return match serde_json::from_str::<ProgressEvent>(json) {
            Ok(event) => OutputLine::Progress(event),
            Err(e) => {
                log::trace!("Unparseable progress line ({}): {}", e, line);
                OutputLine::Other
            }
        };
    }

    match line.strip_prefix(FILE_MARKER) {
        Some(path) if !path.trim().is_empty() => OutputLine::File(PathBuf::from(path.trim())),
        _ => OutputLine::Other,
    }
}

/// Deliverable path for the path yt-dlp reported: same name, target container extension.
pub fn final_output_path(reported: &Path) -> PathBuf {
    reported.with_extension(config::ytdlp::TARGET_CONTAINER)
}

/// Builds the full yt-dlp argument list for a request.
pub fn build_ytdlp_args(request: &ExtractRequest) -> Vec<String> {
    let output = request.output_dir.join(config::ytdlp::OUTPUT_TEMPLATE);

    vec![
        "--quiet".to_string(),
        "--progress".to_string(),
        "--newline".to_string(),
        "--restrict-filenames".to_string(),
        "-f".to_string(),
        config::ytdlp::FORMAT.to_string(),
        "--recode-video".to_string(),
        config::ytdlp::TARGET_CONTAINER.to_string(),
        "--progress-template".to_string(),
        format!("download:{}%(progress)j", PROGRESS_MARKER),
        "--print".to_string(),
        format!("after_move:{}%(filepath)s", FILE_MARKER),
        "-o".to_string(),
        output.to_string_lossy().into_owned(),
        request.url.clone(),
    ]
}

/// Calls `on_line` for every line of `reader` until EOF.
///
/// Invalid UTF-8 (titles quoted in warnings, odd locales) is replaced rather
/// than ending the loop: stopping early would close the pipe and kill yt-dlp
/// with SIGPIPE on its next write.
pub fn for_each_output_line<R: BufRead>(mut reader: R, mut on_line: impl FnMut(&str)) {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("Failed to read yt-dlp output: {}", e);
                break;
            }
        }
    }
}

/// [`Extractor`] backed by the yt-dlp command line tool.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    bin: String,
}

impl YtDlpExtractor {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Uses the binary from `YTDL_BIN`.
    pub fn from_config() -> Self {
        Self::new(config::YTDL_BIN.as_str())
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(
        &self,
        request: &ExtractRequest,
        progress_tx: mpsc::UnboundedSender<ProgressEvent>,
    ) -> AppResult<PathBuf> {
        let bin = self.bin.clone();
        let args = build_ytdlp_args(request);
        log::info!("yt-dlp command: {} {}", bin, args.join(" "));

        tokio::task::spawn_blocking(move || run_ytdlp(&bin, &args, &progress_tx))
            .await
            .map_err(|e| AppError::Extraction(format!("yt-dlp worker failed: {}", e)))?
    }
}

/// Runs yt-dlp to completion, forwarding progress events as they appear.
///
/// Blocking: call from `spawn_blocking`.
fn run_ytdlp(bin: &str, args: &[String], progress_tx: &mpsc::UnboundedSender<ProgressEvent>) -> AppResult<PathBuf> {
    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::Extraction(format!("yt-dlp not found: {}", bin))
            } else {
                AppError::Extraction(format!("Failed to start yt-dlp '{}': {}", bin, e))
            }
        })?;

    // In quiet mode progress goes to stderr, so both streams are scanned
    let stderr_reader = child.stderr.take().map(|stderr| {
        let tx = progress_tx.clone();
        let (tail_tx, tail_rx) = std_mpsc::channel::<VecDeque<String>>();
        std::thread::spawn(move || {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            for_each_output_line(BufReader::new(stderr), |line| match parse_output_line(line) {
                OutputLine::Progress(event) => {
                    let _ = tx.send(event);
                }
                _ => {
                    log::debug!("yt-dlp stderr: {}", line);
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line.to_string());
                }
            });
            let _ = tail_tx.send(tail);
        });
        tail_rx
    });

    let mut reported_path = None;
    if let Some(stdout) = child.stdout.take() {
        for_each_output_line(BufReader::new(stdout), |line| match parse_output_line(line) {
            OutputLine::Progress(event) => {
                let _ = progress_tx.send(event);
            }
            OutputLine::File(path) => {
                log::info!("yt-dlp reported output file: {}", path.display());
                reported_path = Some(path);
            }
            OutputLine::Other => log::debug!("yt-dlp stdout: {}", line),
        });
    }

    let status = child.wait()?;
    let stderr_tail = stderr_reader
        .and_then(|rx| rx.recv().ok())
        .map(|lines| Vec::from(lines).join("\n"))
        .unwrap_or_default();

    if !status.success() {
        log::error!("yt-dlp failed with {}: {}", status, stderr_tail);
        return Err(AppError::Extraction(describe_failure(&stderr_tail, status)));
    }

    reported_path
        .map(|path| final_output_path(&path))
        .ok_or_else(|| AppError::Extraction("yt-dlp finished without reporting an output file".to_string()))
}

/// Runs `<bin> <flag>` and returns the first line of its output.
///
/// `flag` is `--version` for yt-dlp and `-version` for ffmpeg.
pub async fn probe_version(bin: &str, flag: &str) -> AppResult<String> {
    let output = tokio::process::Command::new(bin)
        .arg(flag)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| AppError::Extraction(format!("Failed to run {}: {}", bin, e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.lines().next().unwrap_or_default().trim().to_string();

    if !output.status.success() || version.is_empty() {
        return Err(AppError::Extraction(format!(
            "{} is not installed or {} produced no output",
            bin, flag
        )));
    }

    Ok(version)
}

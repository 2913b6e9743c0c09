//! Turning yt-dlp stderr into a short error description for the user.

use std::fmt::Display;

use crate::core::utils::truncate_tail_utf8;

/// Longest fallback description taken from raw stderr
const MAX_DESCRIPTION_BYTES: usize = 300;

/// Picks the most useful line out of yt-dlp's stderr.
///
/// Prefers the last `ERROR:` line (without the prefix), then the last
/// non-empty line, then the exit status.
pub fn describe_failure(stderr: &str, status: impl Display) -> String {
    let mut lines = stderr.lines().map(str::trim).filter(|line| !line.is_empty());

    if let Some(error_line) = lines.clone().rev().find(|line| line.starts_with("ERROR:")) {
        return error_line.trim_start_matches("ERROR:").trim().to_string();
    }

    match lines.next_back() {
        Some(line) => truncate_tail_utf8(line, MAX_DESCRIPTION_BYTES).to_string(),
        None => format!("yt-dlp exited with {}", status),
    }
}

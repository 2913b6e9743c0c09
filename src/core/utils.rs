/// Whole megabytes in `bytes` (1 MB = 1024 * 1024 bytes), rounded down.
///
/// # Example
///
/// ```
/// use vidrelay::core::utils::format_size_mb;
///
/// assert_eq!(format_size_mb(500 * 1024 * 1024), 500);
/// assert_eq!(format_size_mb(1024 * 1024 - 1), 0);
/// ```
pub fn format_size_mb(bytes: u64) -> u64 {
    bytes / 1024 / 1024
}

/// Returns true if the text is a bot command (`/start`, `/start@bot`, ...).
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with('/')
}

/// Keeps at most `max_bytes` from the end of `text` without splitting a UTF-8 character.
pub fn truncate_tail_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

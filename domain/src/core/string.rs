//! String utilities for the domain layer.

/// Truncate a string to `max_chars` characters, appending `...` when
/// anything was cut off.
///
/// Counts characters rather than bytes, so the result never splits a
/// multi-byte character. The ellipsis is added on top of `max_chars`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}...", &s[..end]),
    }
}

/// Borrow at most `max_bytes` of `s` for log lines, backing off to the
/// previous character boundary.
pub fn log_preview(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}

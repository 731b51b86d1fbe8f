/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Short single-line preview of a response body for error messages and logs.
pub fn body_preview(body: &str, max_bytes: usize) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_to_char_boundary(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{cut}…")
    } else {
        cut.to_string()
    }
}

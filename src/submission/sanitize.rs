pub const DEFAULT_MAX_LEN: usize = 2000;

/// Trim surrounding whitespace and clip to `max_len` characters.
///
/// The clipped text is trimmed again so a cut landing on whitespace never
/// leaves a trailing blank, which keeps the function idempotent.
pub fn sanitize(text: &str, max_len: usize) -> String {
    let mut clipped: String = text.trim().chars().take(max_len).collect();
    let kept = clipped.trim_end().len();
    clipped.truncate(kept);
    clipped
}

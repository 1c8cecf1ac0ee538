const MAX_EXCERPT_CHARS: usize = 256;
const REDACTED: &str = "[REDACTED]";

/// Shortens an upstream body for use in a diagnostic, scrubbing `secret` if
/// the provider happened to echo it back.
pub(crate) fn excerpt(body: &str, secret: &str) -> String {
    let scrubbed = scrub(body.trim(), secret);
    if scrubbed.is_empty() {
        return "<empty body>".to_string();
    }
    match scrubbed.char_indices().nth(MAX_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &scrubbed[..cut]),
        None => scrubbed,
    }
}

pub(crate) fn scrub(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        text.to_string()
    } else {
        text.replace(secret, REDACTED)
    }
}

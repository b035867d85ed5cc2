//! UTF-8-safe text helpers.
//!
//! Slicing `&str[..n]` panics when `n` falls inside a multi-byte character.
//! Device tokens and alert text reach the logs through these helpers so a
//! malformed token can never crash a log statement.

/// Number of leading token characters that may appear in logs.
pub const LOGGED_TOKEN_PREFIX: usize = 8;

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
///
/// Returns the longest prefix of `s` whose byte length is ≤ `max_bytes`
/// and that does not split a multi-byte character.
#[inline]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Log-safe form of a device token: the first [`LOGGED_TOKEN_PREFIX`]
/// bytes followed by `…` when anything was cut.
pub fn token_prefix(token: &str) -> String {
    let prefix = truncate_str(token, LOGGED_TOKEN_PREFIX);
    if prefix.len() == token.len() {
        prefix.to_owned()
    } else {
        format!("{prefix}…")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Log sanitization utilities
//!
//! Keeps API keys and oversized response bodies out of debug/error logs.
//! The registrar authenticates with query parameters, so request URLs
//! must pass through [`redact_credentials`] before they are logged.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Query parameters whose values are never written to logs.
const SECRET_PARAMS: &[&str] = &["api-key", "auth-userid", "passwd"];

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) with a suffix giving the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Replace the values of credential-bearing query parameters with `***`.
///
/// Works on full URLs and on bare `a=b&c=d` strings.
pub fn redact_credentials(url: &str) -> String {
    let (prefix, query) = match url.split_once('?') {
        Some((base, query)) => (Some(base), query),
        None if url.contains('=') => (None, url),
        None => return url.to_string(),
    };

    let redacted: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SECRET_PARAMS.contains(&key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect();

    match prefix {
        Some(base) => format!("{base}?{}", redacted.join("&")),
        None => redacted.join("&"),
    }
}

//! Display-name sanitization and retry-candidate generation.
//!
//! Display names are capped at 16 characters and restricted to
//! `[A-Za-z0-9_]`. Both functions are pure: the applicator relies on
//! `build_candidate` producing the same candidate for the same
//! `(base, attempt)` pair on every call.

use uuid::Uuid;

/// Maximum display-name length accepted by disguise providers.
pub const NAME_MAX: usize = 16;

/// Fallback base name when the input sanitizes away entirely.
const DEFAULT_NAME: &str = "Player";

/// Sanitize raw user input into a usable base name.
///
/// Trims whitespace, substitutes `"Player"` for empty input, maps every
/// disallowed character to `_`, collapses runs of `_`, strips leading and
/// trailing `_` (falling back to `"_"`), and truncates to [`NAME_MAX`].
/// Never fails and never returns an empty string.
pub fn sanitize_base_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let base = if trimmed.is_empty() {
        DEFAULT_NAME
    } else {
        trimmed
    };
    truncate(&sanitize_to_allowed(base), NAME_MAX)
}

/// Build the candidate name for a given retry attempt.
///
/// Attempt 1 is the truncated base name. Attempts 2 and up append `_N` and
/// keep as much of the base as still fits within [`NAME_MAX`].
pub fn build_candidate(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        return truncate(base, NAME_MAX);
    }
    let suffix = format!("_{attempt}");
    let keep = NAME_MAX.saturating_sub(suffix.len()).max(1);
    let kept = truncate(base, keep);
    sanitize_to_allowed(&format!("{kept}{suffix}"))
}

/// Parse an identifier in either hyphenated (36-char) or bare 32-hex form.
///
/// Any other shape yields `None`; malformed input never panics.
pub fn parse_identifier_flexible(s: &str) -> Option<Uuid> {
    if is_hyphenated_shape(s) {
        return Uuid::parse_str(s).ok();
    }
    if s.len() == 32 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        let hyphenated = format!(
            "{}-{}-{}-{}-{}",
            &s[0..8],
            &s[8..12],
            &s[12..16],
            &s[16..20],
            &s[20..32]
        );
        return Uuid::parse_str(&hyphenated).ok();
    }
    None
}

fn is_hyphenated_shape(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    s.bytes().enumerate().all(|(idx, b)| match idx {
        8 | 13 | 18 | 23 => b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

fn sanitize_to_allowed(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_underscore = false;
    for ch in s.chars() {
        let mapped = if ch.is_ascii_alphanumeric() { ch } else { '_' };
        if mapped == '_' {
            if !last_underscore {
                out.push('_');
            }
            last_underscore = true;
        } else {
            out.push(mapped);
            last_underscore = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

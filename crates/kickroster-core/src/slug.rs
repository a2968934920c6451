//! Channel slug normalization.
//!
//! Accepts whatever a user pastes (a channel URL, a bare handle, a handle with
//! stray punctuation) and reduces it to the lowercase `[a-z0-9_]` identifier
//! used as the lookup and cache key.

/// Hosts whose leading `host/` segment is dropped even without a URL scheme.
const PLATFORM_HOSTS: &[&str] = &["kick.com"];

const SCHEMES: &[&str] = &["https://", "http://"];

/// Normalizes raw user input into a channel slug.
///
/// Returns an empty string when nothing usable remains; callers treat that
/// as a missing slug. The output only ever contains `[a-z0-9_]`, so
/// normalizing twice is the same as normalizing once.
///
/// # Examples
///
/// ```
/// use kickroster_core::normalize_slug;
///
/// assert_eq!(normalize_slug("https://www.kick.com/Roxanne_Roxx?ref=home"), "roxanne_roxx");
/// assert_eq!(normalize_slug("kick.com/ket_14"), "ket_14");
/// assert_eq!(normalize_slug("  bad slug! "), "badslug");
/// assert_eq!(normalize_slug("   "), "");
/// ```
#[must_use]
pub fn normalize_slug(input: &str) -> String {
    let mut rest = input.trim();

    let scheme = SCHEMES.iter().find_map(|s| strip_prefix_ignore_case(rest, s));
    let had_scheme = scheme.is_some();
    if let Some(stripped) = scheme {
        rest = stripped;
    }
    if let Some(stripped) = strip_prefix_ignore_case(rest, "www.") {
        rest = stripped;
    }

    if let Some(stripped) = PLATFORM_HOSTS.iter().find_map(|host| {
        strip_prefix_ignore_case(rest, host).and_then(|r| r.strip_prefix('/'))
    }) {
        rest = stripped;
    } else if had_scheme {
        // Any absolute URL with a path: the channel is the first path segment.
        if let Some(idx) = rest.find(['?', '#', '/']) {
            if rest[idx..].starts_with('/') {
                rest = &rest[idx + 1..];
            }
        }
    }

    let end = rest.find(['?', '#', '/']).unwrap_or(rest.len());

    rest[..end]
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
        .collect()
}

/// ASCII case-insensitive `strip_prefix`.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

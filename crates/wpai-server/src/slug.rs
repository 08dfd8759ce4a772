//! Slug normalization shared by every handler that addresses resources by
//! a URL-safe key.

/// Used when normalization leaves nothing behind.
pub const FALLBACK_SLUG: &str = "untitled";

/// Normalizes a title or user-supplied slug into a URL-safe slug.
///
/// Letters are lowercased, alphanumerics kept, runs of whitespace, `-` and
/// `_` collapse to one `-`, everything else is dropped, and leading or
/// trailing dashes are trimmed.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        out
    }
}

/// Uses the explicit slug when one is given, otherwise derives it from
/// `title`. Both paths go through [`slugify`].
pub fn slug_or_title(slug: Option<&str>, title: &str) -> String {
    match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(explicit) => slugify(explicit),
        None => slugify(title),
    }
}

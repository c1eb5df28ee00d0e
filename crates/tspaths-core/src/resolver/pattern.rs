//! Single-wildcard pattern matching for `paths` keys.

/// The wildcard character in `paths` patterns and targets.
pub const WILDCARD: char = '*';

/// Match `pattern` (containing a single `*`) against `candidate`.
///
/// Returns the slice of `candidate` captured by the `*`, which is never empty.
/// A pattern without a wildcard never matches here: exact equality is
/// special-cased by callers, which treat it as an empty capture.
/// Patterns with more than one `*` are not supported and never match.
#[must_use]
pub fn match_star<'a>(pattern: &str, candidate: &'a str) -> Option<&'a str> {
    if candidate.len() < pattern.len() {
        return None;
    }
    if pattern == "*" {
        return Some(candidate);
    }

    let (prefix, suffix) = pattern.split_once(WILDCARD)?;
    if suffix.contains(WILDCARD) {
        return None;
    }

    // `candidate.len() >= pattern.len()` leaves at least one byte between
    // prefix and suffix, so the two can never overlap.
    if !candidate.starts_with(prefix) || !candidate.ends_with(suffix) {
        return None;
    }

    Some(&candidate[prefix.len()..candidate.len() - suffix.len()])
}

/// Length of the literal text before the wildcard.
///
/// Patterns without a wildcard count their full length, so exact keys sort
/// ahead of wildcard keys with the same literal text.
#[must_use]
pub fn prefix_len(pattern: &str) -> usize {
    pattern.find(WILDCARD).unwrap_or(pattern.len())
}

/// Substitute `capture` for the first wildcard in `template`, if it has one.
#[must_use]
pub fn substitute(template: &str, capture: &str) -> String {
    template.replacen(WILDCARD, capture, 1)
}

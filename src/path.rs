//! Path normalization.
//!
//! Every URL entering the router — registered patterns and navigated
//! locations alike — is reduced to a canonical lowercase segment list before
//! comparison. Normalization never fails; any input string is accepted.

/// Normalizes a raw URL into its segment list.
///
/// The query string is stripped at the first `?`, a legacy hash-bang prefix
/// (everything up to and including `#!`) is removed, the remainder is
/// lowercased, one leading and one trailing `/` are stripped, and the result
/// is split on `/`.
///
/// The degenerate empty path normalizes to the single-segment root `["/"]`,
/// which is distinct from an empty list.
///
/// ```
/// assert_eq!(waypoint::path::segments("/Users/42/?x=1"), ["users", "42"]);
/// assert_eq!(waypoint::path::segments("/"), ["/"]);
/// ```
pub fn segments(raw: &str) -> Vec<String> {
    let mut path = raw.trim();

    if let Some((before, _)) = path.split_once('?') {
        path = before;
    }
    if let Some((_, after)) = path.split_once("#!") {
        path = after;
    }

    let lowered = path.to_lowercase();
    let mut trimmed = lowered.as_str();
    trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return vec!["/".to_string()];
    }

    trimmed.split('/').map(str::to_string).collect()
}

/// Normalizes a raw URL into its canonical display form: `/a/b` with no
/// trailing slash, or `/` for the root.
pub fn canonical(raw: &str) -> String {
    canonical_of(&segments(raw))
}

pub(crate) fn canonical_of(segments: &[String]) -> String {
    if segments.len() == 1 && segments[0] == "/" {
        return "/".to_string();
    }

    let mut url = String::new();
    for segment in segments {
        url.push('/');
        url.push_str(segment);
    }
    url
}

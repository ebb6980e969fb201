//! Slash-separated path normalization for table keys.
//!
//! Bundle keys always use `/`, independent of the host, so a bundle built
//! on one platform resolves identically on another.

/// Canonicalize a path lexically.
///
/// Collapses repeated separators, drops `.` segments, resolves `..` against
/// the preceding segment and strips trailing separators. A rooted path never
/// climbs above `/`; a relative path keeps leading `..` segments it cannot
/// resolve. An empty relative result becomes `"."`.
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            normal => segments.push(normal),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Canonicalize `path` as if it were rooted.
///
/// Leading `..` segments are clamped at `/`, so the result can be joined
/// below another path without climbing out of it.
pub fn clean_rooted(path: &str) -> String {
    clean(&format!("/{path}"))
}

/// Join two paths and canonicalize the result.
///
/// Unlike [`std::path::Path::join`], a rooted `path` does not replace
/// `base`; it is appended below it. Empty arguments are ignored, and two
/// empty arguments yield an empty string.
pub fn clean_join(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean(path),
        (false, true) => clean(base),
        (false, false) => clean(&format!("{base}/{path}")),
    }
}

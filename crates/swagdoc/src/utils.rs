//! Path helpers shared by route registration and the documentation endpoints.

/// Join path segments. Every segment gets a leading `/`; trailing slashes are
/// stripped from all segments but the last.
pub fn connect_path(parts: &[&str]) -> String {
    let last = parts.len().saturating_sub(1);
    let mut path = String::new();
    for (i, part) in parts.iter().enumerate() {
        let segment = if part.starts_with('/') {
            part.to_string()
        } else {
            format!("/{}", part)
        };
        if i < last {
            path.push_str(segment.trim_end_matches('/'));
        } else {
            path.push_str(&segment);
        }
    }
    path
}

/// Strip one trailing `/`, keeping a lone root `/`
pub fn remove_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Strip `suffix` from the end of `path`, ignoring a trailing slash on either
pub fn trim_suffix_slash(path: &str, suffix: &str) -> String {
    let suffix = connect_path(&[suffix]);
    let suffix = remove_trailing_slash(&suffix);
    let path = remove_trailing_slash(path);
    path.strip_suffix(suffix).unwrap_or(path).to_string()
}

/// Full route path of `path` registered under a group `prefix`
pub fn join_route(prefix: &str, path: &str) -> String {
    let joined = format!("{}{}", prefix, path);
    if joined.starts_with('/') {
        joined
    } else {
        format!("/{}", joined)
    }
}

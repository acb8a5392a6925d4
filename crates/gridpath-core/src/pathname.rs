//! Lexical helpers over `/`-separated path strings.
//!
//! Both namespaces are addressed with forward slashes; nothing here touches a
//! filesystem.

pub const SEPARATOR: char = '/';

/// Strips trailing separators. A path made only of separators collapses to
/// the root.
pub fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() && path.starts_with(SEPARATOR) {
        "/"
    } else {
        trimmed
    }
}

/// Last component of `path`, ignoring trailing separators. The root has no
/// basename.
pub fn basename(path: &str) -> &str {
    let trimmed = trim_trailing_separators(path);
    if trimmed == "/" {
        return "";
    }
    match trimmed.rfind(SEPARATOR) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Immediate parent of `path`, or `None` for the root and for bare names.
pub fn parent(path: &str) -> Option<&str> {
    let trimmed = trim_trailing_separators(path);
    if trimmed == "/" {
        return None;
    }
    match trimmed.rfind(SEPARATOR) {
        Some(0) => Some("/"),
        Some(idx) => Some(trim_trailing_separators(&trimmed[..idx])),
        None => None,
    }
}

pub fn join(base: &str, name: &str) -> String {
    let name = name.trim_start_matches(SEPARATOR);
    if base.is_empty() {
        return name.to_string();
    }
    if base.ends_with(SEPARATOR) {
        format!("{base}{name}")
    } else {
        format!("{base}{SEPARATOR}{name}")
    }
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Collapses duplicate separators, `.` and `..` without consulting any
/// namespace. `..` never climbs above the root of an absolute path.
pub fn normalize(path: &str) -> String {
    let absolute = is_absolute(path);
    let mut parts: Vec<&str> = Vec::new();
    for component in path.split(SEPARATOR) {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let body = parts.join("/");
    if absolute {
        format!("/{body}")
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

/// First component of an absolute path (`/zone/a` -> `zone`).
pub fn first_component(path: &str) -> Option<&str> {
    path.strip_prefix(SEPARATOR)?
        .split(SEPARATOR)
        .find(|component| !component.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_ignores_trailing_separators() {
        assert_eq!(basename("/zone/coll2"), "coll2");
        assert_eq!(basename("/zone/coll2/"), "coll2");
        assert_eq!(basename("/zone/coll2///"), "coll2");
        assert_eq!(basename("coll2"), "coll2");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn basename_is_stable_under_repeated_trimming() {
        for raw in ["/a/b/", "/a/b", "b//", "/", "///", "a"] {
            let once = trim_trailing_separators(raw);
            let twice = trim_trailing_separators(once);
            assert_eq!(once, twice);
            assert_eq!(basename(raw), basename(once));
        }
    }

    #[test]
    fn parent_walks_one_level() {
        assert_eq!(parent("/zone/a/b"), Some("/zone/a"));
        assert_eq!(parent("/zone/a/b/"), Some("/zone/a"));
        assert_eq!(parent("/zone"), Some("/"));
        assert_eq!(parent("/"), None);
        assert_eq!(parent("name"), None);
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize("/zone//a/./b/../c/"), "/zone/a/c");
        assert_eq!(normalize("/../.."), "/");
        assert_eq!(normalize("a/../../b"), "../b");
        assert_eq!(normalize("./"), ".");
    }

    #[test]
    fn join_avoids_double_separators() {
        assert_eq!(join("/zone/", "a"), "/zone/a");
        assert_eq!(join("/", "zone"), "/zone");
        assert_eq!(join("/zone", "/a"), "/zone/a");
    }

    #[test]
    fn first_component_skips_empty_segments() {
        assert_eq!(first_component("//zone/a"), Some("zone"));
        assert_eq!(first_component("/"), None);
        assert_eq!(first_component("zone/a"), None);
    }
}

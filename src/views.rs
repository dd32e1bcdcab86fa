//! Glob entry construction for views directories.
//!
//! Paths are joined with POSIX semantics regardless of host platform and
//! every backslash is treated as a separator, so a descriptor written on
//! Windows (`views\\admin`) yields the same entry as one written on Unix.

/// Wildcard segment appended to every views directory.
pub const WILDCARD: &str = "*";

/// Join path segments and normalize the result.
///
/// Both `/` and `\` split components and the result always uses `/`.
/// Empty segments and `.` components are dropped, `..` pops the previous
/// component when there is one to pop, and a leading separator on the first
/// segment is preserved. Trailing separators are not kept. An empty result
/// is `"."`.
pub fn join_posix(segments: &[&str]) -> String {
    let absolute = segments
        .iter()
        .find(|s| !s.is_empty())
        .map(|s| s.starts_with('/') || s.starts_with('\\'))
        .unwrap_or(false);

    let mut parts: Vec<&str> = Vec::new();
    for segment in segments {
        for component in segment.split(['/', '\\']) {
            match component {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    }
                    // `..` above the root of an absolute path is a no-op
                    _ if absolute => {}
                    _ => parts.push(".."),
                },
                other => parts.push(other),
            }
        }
    }

    let joined = parts.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Build the manifest glob for a package's views directory.
///
/// ```ignore
/// assert_eq!(glob_entry(".", "foo"), "foo/*");
/// assert_eq!(glob_entry("thing-foo", "foo\\bar"), "thing-foo/foo/bar/*");
/// ```
pub fn glob_entry(base_path: &str, views: &str) -> String {
    let dir = join_posix(&[base_path, views]);
    // only the bare root `/` ends in a separator
    if dir.ends_with('/') {
        format!("{}{}", dir, WILDCARD)
    } else {
        format!("{}/{}", dir, WILDCARD)
    }
}

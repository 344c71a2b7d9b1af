pub const NAMESPACE_SEPARATOR: char = '\\';

/// Trims surrounding separators and appends exactly one trailing separator.
/// An empty namespace stays empty (the global namespace).
pub fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim().trim_matches(NAMESPACE_SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}{NAMESPACE_SEPARATOR}")
    }
}

/// Strips a leading global separator so `\App\User` and `App\User` compare equal.
pub fn trim_type_name(name: &str) -> &str {
    name.trim().trim_start_matches(NAMESPACE_SEPARATOR)
}

pub fn namespace_segments(namespace: &str) -> Vec<&str> {
    namespace
        .split(NAMESPACE_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect()
}

/// PHP type names are case-insensitive.
pub fn type_names_eq(a: &str, b: &str) -> bool {
    trim_type_name(a).eq_ignore_ascii_case(trim_type_name(b))
}

pub fn type_key(name: &str) -> String {
    trim_type_name(name).to_ascii_lowercase()
}

/// Removes everything from the last `.` of a file name. `.php` yields an
/// empty string, `Makefile` is returned unchanged.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

pub fn extract_last_segment(name: &str) -> &str {
    name.rsplit(NAMESPACE_SEPARATOR).next().unwrap_or(name)
}

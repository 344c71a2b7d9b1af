use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Absolute, lexically cleaned path text using `/` as the only separator.
/// Symlinks are not resolved and the path need not exist. A path that
/// cannot be made absolute (the empty path) is used as given.
pub fn normalize_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    let text = cleaned.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(MAIN_SEPARATOR, "/")
    }
}

/// [`normalize_path`] terminated by exactly one `/`.
pub fn normalize_dir(path: &Path) -> String {
    let mut text = normalize_path(path);
    if !text.ends_with('/') {
        text.push('/');
    }
    text
}

use std::path::PathBuf;

pub fn get_test_fixture_path(project: &str, relative: Option<&str>) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(project);
    match relative {
        Some(relative) => root.join(relative),
        None => root,
    }
}

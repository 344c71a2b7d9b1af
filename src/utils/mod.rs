pub mod path;
pub mod string;

pub use path::{normalize_dir, normalize_path};
pub use string::*;

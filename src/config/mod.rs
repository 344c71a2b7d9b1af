pub mod loader;

pub use loader::{parse_mapping, Config, DEFAULT_CONFIG_FILES};

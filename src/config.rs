use std::path::PathBuf;

/// Directory searched for imports that are not found relative to the
/// working directory.
pub const DEFAULT_MODULE_DIR: &str = "examples";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub module_dir: PathBuf,
}

impl Config {
    pub fn with_module_dir(module_dir: impl Into<PathBuf>) -> Self {
        Config {
            module_dir: module_dir.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::with_module_dir(DEFAULT_MODULE_DIR)
    }
}

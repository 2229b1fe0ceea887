use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

const DEFAULT_LOG_DIRECTORY: &str = ".logs";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Root of the rolling `debug/` and `error/` log directories
    pub directory: Option<String>,
}

impl LoggingConfig {
    pub fn base_dir(&self) -> &Path {
        Path::new(self.directory.as_deref().filter(|dir| !dir.trim().is_empty()).unwrap_or(DEFAULT_LOG_DIRECTORY))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: Some(DEFAULT_LOG_DIRECTORY.to_string()),
        }
    }
}

pub mod explorer;
pub mod log;
pub mod tracer;

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use toml;

pub use explorer::ExplorerConfig;
pub use log::LoggingConfig;
pub use tracer::TracerConfig;

use crate::err_with_loc;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub explorer: ExplorerConfig,
    pub tracer: TracerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.explorer.base_url)
            .map_err(|e| ConfigError::InvalidValue(format!("explorer.base_url {:?}: {}", self.explorer.base_url, e)))?;

        if self.tracer.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue("tracer.max_concurrent_requests must be at least 1".to_string()));
        }

        if self.tracer.trace_deadline_secs == 0 {
            return Err(ConfigError::InvalidValue("tracer.trace_deadline_secs must be at least 1".to_string()));
        }

        Ok(())
    }
}

pub fn parse_config(config_str: &str) -> crate::Result<Config> {
    let mut config: Config =
        toml::from_str(config_str).map_err(|e| err_with_loc!(ConfigError::ParseError(e.to_string())))?;
    config.explorer.apply_env_overrides();
    config.validate().map_err(|e| err_with_loc!(e))?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> crate::Result<Config> {
    let path = path.as_ref();
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| err_with_loc!(ConfigError::OpenFileError(format!("{}: {}", path.display(), e))))?;
    parse_config(&config_str)
}

/// Like [`load_config`], but a missing file yields defaults (still honouring the environment)
pub fn load_config_or_default(path: impl AsRef<Path>) -> crate::Result<Config> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    let mut config = Config::default();
    config.explorer.apply_env_overrides();
    Ok(config)
}

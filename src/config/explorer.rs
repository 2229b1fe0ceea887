use serde::Deserialize;
use serde::Serialize;

use crate::constants::ETHERSCAN_API_KEY_ENV;
use crate::constants::ETHERSCAN_API_URL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub chain_id: u64,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub max_retries: usize,
    pub base_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: ETHERSCAN_API_URL.to_string(),
            chain_id: 1,
            api_key: None,
            timeout_ms: 15_000,
            max_retries: 3,
            base_retry_delay_ms: 500,
            max_retry_delay_ms: 8_000,
        }
    }
}

impl ExplorerConfig {
    /// A non-empty `ETHERSCAN_API_KEY` in the environment wins over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ETHERSCAN_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key.trim().to_string());
            }
        }
    }
}

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Frontier addresses queried at once within a hop
    pub max_concurrent_requests: usize,
    /// Caller-level deadline around a whole trace
    pub trace_deadline_secs: u64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 8,
            trace_deadline_secs: 120,
        }
    }
}

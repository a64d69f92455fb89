//! Configuration for the Orchestrator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on a single retry delay
const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Configuration for the Orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum time for a single extraction call (seconds)
    pub call_timeout_secs: u64,

    /// Extra attempts after a failed call (0 = no retries)
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds), doubled per attempt
    pub retry_backoff_ms: u64,

    /// Maximum extraction calls in flight (1 = strictly sequential)
    pub concurrency: usize,
}

impl OrchestratorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let ms = self.retry_backoff_ms.saturating_mul(factor).min(MAX_RETRY_DELAY_MS);
        Duration::from_millis(ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for OrchestratorConfig {
    /// Sequential processing, no retries
    fn default() -> Self {
        Self {
            call_timeout_secs: 120,
            max_retries: 0,
            retry_backoff_ms: 1_000,
            concurrency: 1,
        }
    }
}

impl OrchestratorConfig {
    /// Aggressive preset: short timeouts, fail fast
    pub fn aggressive() -> Self {
        Self {
            call_timeout_secs: 60,
            max_retries: 0,
            retry_backoff_ms: 500,
            concurrency: 1,
        }
    }

    /// Lenient preset: long timeouts and a couple of retries
    pub fn lenient() -> Self {
        Self {
            call_timeout_secs: 300,
            max_retries: 2,
            retry_backoff_ms: 2_000,
            concurrency: 1,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

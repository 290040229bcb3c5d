use std::time::Duration;

use selector::SelectorConfig;
use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

/// Orchestrator configuration, loaded from an optional `platepix` config
/// file with `PLATEPIX__*` environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerConfig {
    /// Minimum qualifying cosine similarity.
    #[serde(default = "default_cosine_threshold")]
    pub cosine_threshold: f32,

    /// Minimum qualifying text overlap.
    #[serde(default = "default_text_threshold")]
    pub text_threshold: f32,

    /// Maximum meals processed per batch (also the persistence
    /// checkpoint interval).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Wall-clock execution budget for one invocation, in seconds.
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,

    /// Safety margin: the batch loop stops once remaining budget drops
    /// to this value, in seconds.
    #[serde(default = "default_safety_buffer_secs")]
    pub safety_buffer_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cosine_threshold: default_cosine_threshold(),
            text_threshold: default_text_threshold(),
            batch_size: default_batch_size(),
            time_budget_secs: default_time_budget_secs(),
            safety_buffer_secs: default_safety_buffer_secs(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a `platepix` file (if present) and the
    /// environment.
    pub fn load() -> Result<Self, RunnerError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("platepix").required(false))
            .add_source(
                config::Environment::with_prefix("PLATEPIX")
                    .separator("__")
                    .try_parsing(true),
            );

        let cfg: RunnerConfig = builder
            .build()
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| RunnerError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.batch_size == 0 {
            return Err(RunnerError::Config("batch_size must be >= 1".into()));
        }
        if self.safety_buffer_secs >= self.time_budget_secs {
            return Err(RunnerError::Config(
                "safety_buffer_secs must be smaller than time_budget_secs".into(),
            ));
        }
        self.selector_config().validate()?;
        Ok(())
    }

    pub fn selector_config(&self) -> SelectorConfig {
        SelectorConfig {
            cosine_threshold: self.cosine_threshold,
            text_threshold: self.text_threshold,
        }
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_secs(self.time_budget_secs)
    }

    pub fn safety_buffer(&self) -> Duration {
        Duration::from_secs(self.safety_buffer_secs)
    }
}

fn default_cosine_threshold() -> f32 {
    0.2
}

fn default_text_threshold() -> f32 {
    0.2
}

fn default_batch_size() -> usize {
    50
}

fn default_time_budget_secs() -> u64 {
    240
}

fn default_safety_buffer_secs() -> u64 {
    30
}

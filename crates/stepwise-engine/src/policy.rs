//! Per-step timeout and retry policy.

use std::time::Duration;

use stepwise_config::{EngineConfig, TimeoutConfig};
use stepwise_protocols::{ActionKind, Step};

/// Timeouts, retry budgets and backoff derived from configuration.
#[derive(Debug, Clone)]
pub struct ExecutionPolicy {
    timeouts: TimeoutConfig,
    default_retries: u32,
    timing_sensitive_extra_retries: u32,
    backoff: Duration,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ExecutionPolicy {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            timeouts: config.timeouts.clone(),
            default_retries: config.default_retries,
            timing_sensitive_extra_retries: config.timing_sensitive_extra_retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Override the pause between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Default timeout for an action kind.
    pub fn default_timeout(&self, kind: ActionKind) -> Duration {
        let ms = match kind {
            ActionKind::Navigate => self.timeouts.navigate_ms,
            ActionKind::Click => self.timeouts.click_ms,
            ActionKind::Type => self.timeouts.type_ms,
            ActionKind::Hover => self.timeouts.hover_ms,
            ActionKind::Select => self.timeouts.select_ms,
            ActionKind::Press => self.timeouts.press_ms,
            ActionKind::Wait => self.timeouts.wait_ms,
            ActionKind::Verify => self.timeouts.verify_ms,
        };
        Duration::from_millis(ms)
    }

    /// The step's own timeout, or the kind default.
    pub fn timeout_for(&self, step: &Step) -> Duration {
        match (step.timeout_ms, step.action.kind()) {
            (Some(ms), _) => Duration::from_millis(ms),
            (None, Some(kind)) => self.default_timeout(kind),
            (None, None) => Duration::from_millis(self.timeouts.click_ms),
        }
    }

    /// Retries after the first attempt.
    ///
    /// An explicit budget is used verbatim; otherwise wait and verify steps
    /// get the timing-sensitive bonus on top of the default.
    pub fn retries_for(&self, step: &Step) -> u32 {
        if let Some(retries) = step.retries {
            return retries;
        }
        match step.action.kind() {
            Some(ActionKind::Wait | ActionKind::Verify) => {
                self.default_retries + self.timing_sensitive_extra_retries
            }
            _ => self.default_retries,
        }
    }
}

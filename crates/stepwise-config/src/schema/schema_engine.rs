//! Engine and resolver configuration types.

use serde::{Deserialize, Serialize};

/// What the orchestrator does after a non-optional step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop processing further steps.
    #[default]
    Stop,
    /// Keep running the remaining steps.
    Continue,
}

/// Step execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed pause between attempts of one step.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Retry budget for steps that do not set one.
    #[serde(default = "default_retries")]
    pub default_retries: u32,

    /// Extra retries granted to wait/verify steps that do not set a budget.
    #[serde(default = "default_timing_sensitive_extra_retries")]
    pub timing_sensitive_extra_retries: u32,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Append never-attempted steps as skipped after a stop.
    #[serde(default)]
    pub report_unattempted_as_skipped: bool,

    /// Caller-level deadline for a whole run.
    #[serde(default)]
    pub run_timeout_secs: Option<u64>,

    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backoff_ms: default_backoff_ms(),
            default_retries: default_retries(),
            timing_sensitive_extra_retries: default_timing_sensitive_extra_retries(),
            on_failure: FailurePolicy::default(),
            report_unattempted_as_skipped: false,
            run_timeout_secs: None,
            timeouts: TimeoutConfig::default(),
        }
    }
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_retries() -> u32 {
    2
}

fn default_timing_sensitive_extra_retries() -> u32 {
    1
}

/// Per-action default timeouts. Navigation gets the longest budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_navigate_ms")]
    pub navigate_ms: u64,
    #[serde(default = "default_interaction_ms")]
    pub click_ms: u64,
    #[serde(default = "default_interaction_ms")]
    pub type_ms: u64,
    #[serde(default = "default_interaction_ms")]
    pub hover_ms: u64,
    #[serde(default = "default_interaction_ms")]
    pub select_ms: u64,
    #[serde(default = "default_interaction_ms")]
    pub press_ms: u64,
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,
    #[serde(default = "default_verify_ms")]
    pub verify_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigate_ms: default_navigate_ms(),
            click_ms: default_interaction_ms(),
            type_ms: default_interaction_ms(),
            hover_ms: default_interaction_ms(),
            select_ms: default_interaction_ms(),
            press_ms: default_interaction_ms(),
            wait_ms: default_wait_ms(),
            verify_ms: default_verify_ms(),
        }
    }
}

impl TimeoutConfig {
    /// All budgets with their config paths, for validation.
    pub fn entries(&self) -> [(&'static str, u64); 8] {
        [
            ("navigate_ms", self.navigate_ms),
            ("click_ms", self.click_ms),
            ("type_ms", self.type_ms),
            ("hover_ms", self.hover_ms),
            ("select_ms", self.select_ms),
            ("press_ms", self.press_ms),
            ("wait_ms", self.wait_ms),
            ("verify_ms", self.verify_ms),
        ]
    }
}

fn default_navigate_ms() -> u64 {
    30_000
}

fn default_interaction_ms() -> u64 {
    10_000
}

fn default_wait_ms() -> u64 {
    20_000
}

fn default_verify_ms() -> u64 {
    15_000
}

/// Element resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Cap on candidates sent to the matching oracle.
    #[serde(default = "default_max_oracle_candidates")]
    pub max_oracle_candidates: usize,

    /// Text longer than this is never used as a `text=` locator.
    #[serde(default = "default_short_text_limit")]
    pub short_text_limit: usize,

    /// Per-candidate text cap in oracle requests.
    #[serde(default = "default_candidate_text_limit")]
    pub candidate_text_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_oracle_candidates: default_max_oracle_candidates(),
            short_text_limit: default_short_text_limit(),
            candidate_text_limit: default_candidate_text_limit(),
        }
    }
}

fn default_max_oracle_candidates() -> usize {
    20
}

fn default_short_text_limit() -> usize {
    50
}

fn default_candidate_text_limit() -> usize {
    80
}

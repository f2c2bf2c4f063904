//! Step and run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Resolution, Step};

/// Lifecycle of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Running,
    Passed,
    Failed,
    Skipped,
}

/// Outcome of one step, built by the step executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_number: u32,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub optional: bool,
    pub status: StepStatus,
    /// Attempts actually used (0 for steps that never ran).
    pub attempts: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Resolution used by the last attempt, for descriptive targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

impl StepResult {
    /// A fresh result in the `Running` state.
    pub fn start(step: &Step) -> Self {
        Self {
            step_number: step.number,
            action: step.action.name().to_string(),
            target: step.target.clone(),
            optional: step.optional,
            status: StepStatus::Running,
            attempts: 0,
            started_at: Utc::now(),
            finished_at: None,
            duration_ms: 0,
            error: None,
            screenshot: None,
            video: None,
            resolution: None,
        }
    }

    /// A step that was never attempted.
    pub fn skipped(step: &Step) -> Self {
        let mut result = Self::start(step);
        result.finish(StepStatus::Skipped);
        result
    }

    /// Move to a terminal status and stamp the end time.
    pub fn finish(&mut self, status: StepStatus) {
        let now = Utc::now();
        self.status = status;
        self.finished_at = Some(now);
        self.duration_ms = (now - self.started_at).num_milliseconds().max(0) as u64;
    }

    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }

    /// A failure that must abort a stop-on-failure run.
    pub fn is_blocking_failure(&self) -> bool {
        self.is_failed() && !self.optional
    }
}

/// Overall verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Passed,
    Failed,
    Partial,
    Error,
}

/// Where the run first went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureSummary {
    pub step_number: u32,
    pub action: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

/// Aggregate result of a run. Only produced by [`TestResultBuilder::finalize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub run_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    pub steps: Vec<StepResult>,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_failure: Option<FailureSummary>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl TestResult {
    /// Derive the verdict from step results.
    ///
    /// `passed` iff every step passed, `failed` iff a non-optional step
    /// failed, `partial` otherwise.
    pub fn derive_status(steps: &[StepResult]) -> RunStatus {
        if steps.iter().all(|s| s.status == StepStatus::Passed) {
            RunStatus::Passed
        } else if steps.iter().any(StepResult::is_blocking_failure) {
            RunStatus::Failed
        } else {
            RunStatus::Partial
        }
    }

    /// Whether the counters add up.
    pub fn is_consistent(&self) -> bool {
        self.passed + self.failed + self.skipped == self.total
            && self.total as usize == self.steps.len()
    }
}

/// Accumulates step results; consumed exactly once by [`finalize`](Self::finalize).
#[derive(Debug)]
pub struct TestResultBuilder {
    run_id: Uuid,
    plan_name: Option<String>,
    steps: Vec<StepResult>,
    passed: u32,
    failed: u32,
    skipped: u32,
    run_error: Option<String>,
    started_at: DateTime<Utc>,
}

impl TestResultBuilder {
    pub fn new(plan_name: Option<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            plan_name,
            steps: Vec::new(),
            passed: 0,
            failed: 0,
            skipped: 0,
            run_error: None,
            started_at: Utc::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Append a terminal step result and bump its counter.
    ///
    /// A result still in `Running` is counted as failed.
    pub fn push(&mut self, mut step: StepResult) {
        match step.status {
            StepStatus::Passed => self.passed += 1,
            StepStatus::Skipped => self.skipped += 1,
            StepStatus::Failed => self.failed += 1,
            StepStatus::Running => {
                if step.error.is_none() {
                    step.error = Some("step did not finish".to_string());
                }
                step.finish(StepStatus::Failed);
                self.failed += 1;
            }
        }
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    /// Mark the run as unusable; keeps the first message.
    pub fn fail_run(&mut self, message: impl Into<String>) {
        if self.run_error.is_none() {
            self.run_error = Some(message.into());
        }
    }

    pub fn finalize(self) -> TestResult {
        let finished_at = Utc::now();
        let first_failure = self.steps.iter().find(|s| s.is_failed()).map(|s| {
            FailureSummary {
                step_number: s.step_number,
                action: s.action.clone(),
                error: s.error.clone().unwrap_or_default(),
                screenshot: s.screenshot.clone(),
            }
        });

        let (status, error) = match self.run_error {
            Some(message) => (RunStatus::Error, Some(message)),
            None => {
                let status = TestResult::derive_status(&self.steps);
                let error = first_failure
                    .as_ref()
                    .map(|f| format!("Step {} ({}) failed: {}", f.step_number, f.action, f.error));
                (status, error)
            }
        };

        TestResult {
            run_id: self.run_id,
            plan_name: self.plan_name,
            total: self.steps.len() as u32,
            steps: self.steps,
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
            status,
            error,
            first_failure,
            started_at: self.started_at,
            finished_at,
            duration_ms: (finished_at - self.started_at).num_milliseconds().max(0) as u64,
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;

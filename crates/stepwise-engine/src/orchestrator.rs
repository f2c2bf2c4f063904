//! Test run orchestration: ordered steps, failure policy, aggregation.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stepwise_config::{EngineConfig, FailurePolicy};
use stepwise_protocols::{BrowserSession, Step, StepResult, TestResult, TestResultBuilder};

use crate::executor::StepExecutor;

/// Message recorded on a run aborted through its cancellation token.
pub const CANCELLED_MESSAGE: &str = "Run cancelled";

/// Iterates steps in order and applies the failure policy. Never retries.
pub struct Orchestrator {
    executor: StepExecutor,
    on_failure: FailurePolicy,
    report_unattempted_as_skipped: bool,
}

impl Orchestrator {
    pub fn new(executor: StepExecutor) -> Self {
        Self {
            executor,
            on_failure: FailurePolicy::Stop,
            report_unattempted_as_skipped: false,
        }
    }

    /// Take the failure policy and skip reporting from engine configuration.
    pub fn with_engine_config(mut self, config: &EngineConfig) -> Self {
        self.on_failure = config.on_failure;
        self.report_unattempted_as_skipped = config.report_unattempted_as_skipped;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn with_unattempted_as_skipped(mut self, enabled: bool) -> Self {
        self.report_unattempted_as_skipped = enabled;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.on_failure
    }

    /// Run every step and finalize the result.
    pub async fn execute(
        &self,
        session: &dyn BrowserSession,
        plan_name: Option<String>,
        steps: &[Step],
        cancel: &CancellationToken,
    ) -> TestResult {
        let mut builder = TestResultBuilder::new(plan_name);
        self.execute_into(session, steps, cancel, &mut builder).await;
        builder.finalize()
    }

    /// Run steps, appending results to a builder owned by the caller.
    pub async fn execute_into(
        &self,
        session: &dyn BrowserSession,
        steps: &[Step],
        cancel: &CancellationToken,
        builder: &mut TestResultBuilder,
    ) {
        for (position, step) in steps.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!("Run {} cancelled before step {}", builder.run_id(), step.number);
                builder.fail_run(CANCELLED_MESSAGE);
                self.skip_rest(&steps[position..], builder);
                return;
            }

            let result = self.executor.run(session, step, cancel).await;
            let cancelled = cancel.is_cancelled() && result.is_failed();
            let blocking = result.is_blocking_failure();
            builder.push(result);

            if cancelled {
                builder.fail_run(CANCELLED_MESSAGE);
                self.skip_rest(&steps[position + 1..], builder);
                return;
            }

            if blocking && self.on_failure == FailurePolicy::Stop {
                info!(
                    "Stopping run {} after step {} failed ({} step(s) not attempted)",
                    builder.run_id(),
                    step.number,
                    steps.len() - position - 1
                );
                self.skip_rest(&steps[position + 1..], builder);
                return;
            }
        }
    }

    fn skip_rest(&self, rest: &[Step], builder: &mut TestResultBuilder) {
        if self.report_unattempted_as_skipped {
            for step in rest {
                builder.push(StepResult::skipped(step));
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;

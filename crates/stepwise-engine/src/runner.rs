//! Run lifecycle: open a session, execute the plan, always tear down.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use stepwise_config::Config;
use stepwise_protocols::{
    ArtifactCapture, MatchOracle, RunStatus, SessionFactory, TestPlan, TestResult,
    TestResultBuilder,
};

use crate::executor::{ArtifactSettings, StepExecutor};
use crate::orchestrator::Orchestrator;
use crate::policy::ExecutionPolicy;
use crate::resolver::ElementResolver;

/// Owns one session per run and guarantees its teardown.
pub struct TestRunner {
    factory: Arc<dyn SessionFactory>,
    orchestrator: Orchestrator,
}

impl TestRunner {
    pub fn new(factory: Arc<dyn SessionFactory>, orchestrator: Orchestrator) -> Self {
        Self {
            factory,
            orchestrator,
        }
    }

    /// Wire the engine from configuration.
    pub fn from_config(
        config: &Config,
        factory: Arc<dyn SessionFactory>,
        oracle: Option<Arc<dyn MatchOracle>>,
        artifacts: Option<Arc<dyn ArtifactCapture>>,
    ) -> Self {
        let mut resolver = ElementResolver::new(config.resolver.clone());
        if let Some(oracle) = oracle {
            resolver = resolver.with_oracle(oracle);
        }

        let mut executor =
            StepExecutor::new(resolver, ExecutionPolicy::from_config(&config.engine));
        if let Some(capture) = artifacts {
            executor = executor.with_artifacts(capture, ArtifactSettings::from(&config.artifacts));
        }

        let orchestrator = Orchestrator::new(executor).with_engine_config(&config.engine);
        Self::new(factory, orchestrator)
    }

    /// Execute `plan` in a fresh session.
    ///
    /// Launch, teardown and cancellation problems are reported as status
    /// `error`; step failures only ever show up on their step results. A panic
    /// inside the run is re-raised after the session has been closed.
    pub async fn run(&self, plan: &TestPlan, cancel: CancellationToken) -> TestResult {
        let mut builder = TestResultBuilder::new(plan.name.clone());
        info!(
            "Run {} starting: plan={:?}, {} step(s)",
            builder.run_id(),
            plan.name.as_deref().unwrap_or("unnamed"),
            plan.steps.len()
        );

        let session = match self.factory.open().await {
            Ok(session) => session,
            Err(e) => {
                error!("Run {} could not open a browser session: {}", builder.run_id(), e);
                builder.fail_run(e.to_string());
                return builder.finalize();
            }
        };

        let outcome = AssertUnwindSafe(self.orchestrator.execute_into(
            session.as_ref(),
            &plan.steps,
            &cancel,
            &mut builder,
        ))
        .catch_unwind()
        .await;

        if let Err(e) = session.close().await {
            error!("Run {} teardown failed: {}", builder.run_id(), e);
            builder.fail_run(e.to_string());
        }

        if let Err(panic) = outcome {
            error!("Run {} panicked; session closed, resuming unwind", builder.run_id());
            std::panic::resume_unwind(panic);
        }

        let result = builder.finalize();
        match result.status {
            RunStatus::Error => error!(
                "Run {} errored: {}",
                result.run_id,
                result.error.as_deref().unwrap_or("unknown error")
            ),
            status => info!(
                "Run {} finished {:?}: {} passed, {} failed, {} skipped in {}ms",
                result.run_id, status, result.passed, result.failed, result.skipped, result.duration_ms
            ),
        }
        result
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

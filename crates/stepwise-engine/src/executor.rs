//! Step executor: resolution, bounded retries, timeouts and failure artifacts.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stepwise_config::ArtifactsConfig;
use stepwise_protocols::{
    ActionKind, ArtifactCapture, ArtifactKind, BrowserSession, Resolution, Step, StepError,
    StepResult, StepStatus, TargetRef,
};

use crate::policy::ExecutionPolicy;
use crate::resolver::ElementResolver;
use crate::translate::{needs_locator, to_browser_action};

/// Extra time granted to a session to report its own timeout before the
/// executor gives up on the call.
const PERFORM_GRACE: Duration = Duration::from_millis(250);

/// Upper bound for producing one failure artifact.
const ARTIFACT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which artifacts to collect when a step ends failed.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSettings {
    pub screenshot_on_failure: bool,
    pub video_on_failure: bool,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            screenshot_on_failure: true,
            video_on_failure: false,
        }
    }
}

impl From<&ArtifactsConfig> for ArtifactSettings {
    fn from(config: &ArtifactsConfig) -> Self {
        Self {
            screenshot_on_failure: config.screenshot_on_failure,
            video_on_failure: config.video_on_failure,
        }
    }
}

/// Runs one step to a terminal result. Step failures never escape as errors.
pub struct StepExecutor {
    resolver: ElementResolver,
    policy: ExecutionPolicy,
    artifacts: Option<Arc<dyn ArtifactCapture>>,
    artifact_settings: ArtifactSettings,
}

impl StepExecutor {
    pub fn new(resolver: ElementResolver, policy: ExecutionPolicy) -> Self {
        Self {
            resolver,
            policy,
            artifacts: None,
            artifact_settings: ArtifactSettings::default(),
        }
    }

    /// Attach the capture used when a step ends failed.
    pub fn with_artifacts(
        mut self,
        capture: Arc<dyn ArtifactCapture>,
        settings: ArtifactSettings,
    ) -> Self {
        self.artifacts = Some(capture);
        self.artifact_settings = settings;
        self
    }

    pub fn policy(&self) -> &ExecutionPolicy {
        &self.policy
    }

    /// Execute `step` against `session`.
    pub async fn run(
        &self,
        session: &dyn BrowserSession,
        step: &Step,
        cancel: &CancellationToken,
    ) -> StepResult {
        let mut result = StepResult::start(step);
        let retries = self.policy.retries_for(step);
        let timeout = self.policy.timeout_for(step);

        info!(
            "Step {} ({}) started: target={:?}, retries={}, timeout={:?}",
            step.number,
            step.action,
            step.target.as_deref().unwrap_or(""),
            retries,
            timeout
        );

        let mut last_error = None;
        for attempt in 0..=retries {
            if cancel.is_cancelled() {
                last_error = Some(StepError::Cancelled);
                break;
            }
            result.attempts = attempt + 1;

            match self.attempt(session, step, timeout, &mut result.resolution).await {
                Ok(()) => {
                    result.finish(StepStatus::Passed);
                    info!(
                        "Step {} ({}) passed after {} attempt(s) in {}ms",
                        step.number, step.action, result.attempts, result.duration_ms
                    );
                    return result;
                }
                Err(e) => {
                    let retry = e.is_retryable() && attempt < retries;
                    if retry {
                        warn!(
                            "Step {} ({}) attempt {}/{} failed: {}, retrying in {:?}",
                            step.number,
                            step.action,
                            attempt + 1,
                            retries + 1,
                            e,
                            self.policy.backoff()
                        );
                    }
                    last_error = Some(e);
                    if !retry {
                        break;
                    }
                    tokio::select! {
                        _ = tokio::time::sleep(self.policy.backoff()) => {}
                        _ = cancel.cancelled() => {}
                    }
                }
            }
        }

        let error = last_error.unwrap_or(StepError::Cancelled);
        result.error = Some(error.to_string());
        self.capture_artifacts(session, step, &mut result).await;
        result.finish(StepStatus::Failed);
        warn!(
            "Step {} ({}) failed after {} attempt(s): {}",
            step.number, step.action, result.attempts, error
        );
        result
    }

    /// One attempt: resolve (for descriptive targets), build the action, perform it.
    async fn attempt(
        &self,
        session: &dyn BrowserSession,
        step: &Step,
        timeout: Duration,
        resolution: &mut Option<Resolution>,
    ) -> Result<(), StepError> {
        let Some(kind) = step.action.kind() else {
            return Err(StepError::UnsupportedAction(step.action.name().to_string()));
        };

        *resolution = None;
        if needs_locator(step, kind) {
            *resolution = Some(self.locate(session, step, kind).await?);
        }
        let locator = resolution.as_ref().map(|r| r.locator.as_str());

        let action = to_browser_action(step, kind, locator)?;
        debug!("Step {} performing: {}", step.number, action);

        match tokio::time::timeout(timeout + PERFORM_GRACE, session.perform(&action, timeout)).await
        {
            Ok(outcome) => outcome.map_err(StepError::from),
            Err(_) => Err(StepError::ActionTimeout(format!(
                "{} did not complete within {}ms",
                action,
                timeout.as_millis()
            ))),
        }
    }

    async fn locate(
        &self,
        session: &dyn BrowserSession,
        step: &Step,
        kind: ActionKind,
    ) -> Result<Resolution, StepError> {
        match step.target_ref() {
            Some(TargetRef::Locator(locator)) => Ok(Resolution::literal(locator)),
            Some(TargetRef::Description(description)) => {
                let snapshot = session.snapshot().await?;
                self.resolver.resolve(description, kind, &snapshot).await
            }
            None => Err(StepError::ResolutionNotFound("step has no target".to_string())),
        }
    }

    /// Attach failure evidence. Capture errors are logged and dropped.
    async fn capture_artifacts(
        &self,
        session: &dyn BrowserSession,
        step: &Step,
        result: &mut StepResult,
    ) {
        let Some(capture) = self.artifacts.as_ref() else {
            return;
        };

        let mut kinds = Vec::new();
        if self.artifact_settings.screenshot_on_failure {
            kinds.push(ArtifactKind::Screenshot);
        }
        if self.artifact_settings.video_on_failure {
            kinds.push(ArtifactKind::Video);
        }

        for kind in kinds {
            let captured =
                tokio::time::timeout(ARTIFACT_TIMEOUT, capture.capture(session, step.number, kind))
                    .await;
            let reference = match captured {
                Ok(Ok(reference)) => reference,
                Ok(Err(e)) => {
                    warn!("Failed to capture {} for step {}: {}", kind, step.number, e);
                    continue;
                }
                Err(_) => {
                    warn!(
                        "Capturing {} for step {} timed out after {:?}",
                        kind, step.number, ARTIFACT_TIMEOUT
                    );
                    continue;
                }
            };
            match kind {
                ArtifactKind::Screenshot => result.screenshot = reference,
                ArtifactKind::Video => result.video = reference,
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

use super::*;
use crate::testing::{MockCapture, MockFactory, MockSession};
use stepwise_config::FailurePolicy;
use stepwise_protocols::{ActionError, ActionKind, BrowserAction, Step, StepStatus};

fn fast_config() -> Config {
    let mut config = Config::default();
    config.engine.backoff_ms = 1;
    config
}

fn runner(session: Arc<MockSession>, config: &Config) -> (TestRunner, Arc<MockFactory>) {
    let factory = Arc::new(MockFactory::new(session));
    let runner = TestRunner::from_config(config, factory.clone(), None, None);
    (runner, factory)
}

fn plan(steps: Vec<Step>) -> TestPlan {
    TestPlan {
        name: Some("checkout".to_string()),
        steps,
    }
}

#[tokio::test]
async fn test_run_passes_and_closes_session() {
    let session = Arc::new(MockSession::new());
    let (runner, factory) = runner(session.clone(), &fast_config());
    let result = runner
        .run(
            &plan(vec![Step::new(1, ActionKind::Click).with_target("#buy")]),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(result.status, RunStatus::Passed);
    assert_eq!(result.plan_name.as_deref(), Some("checkout"));
    assert_eq!(factory.opens(), 1);
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_launch_failure_is_error() {
    let factory = Arc::new(MockFactory::failing());
    let runner = TestRunner::from_config(&fast_config(), factory, None, None);
    let result = runner
        .run(
            &plan(vec![Step::new(1, ActionKind::Click).with_target("#buy")]),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.total, 0);
    assert!(result.error.unwrap().contains("chrome not found"));
}

#[tokio::test]
async fn test_teardown_failure_is_error_and_keeps_steps() {
    let session = Arc::new(MockSession::new().failing_close());
    let (runner, _) = runner(session.clone(), &fast_config());
    let result = runner
        .run(
            &plan(vec![Step::new(1, ActionKind::Click).with_target("#buy")]),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.passed, 1);
    assert_eq!(result.steps.len(), 1);
    assert!(result.error.unwrap().contains("teardown"));
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_cancelled_run_closes_session() {
    let session = Arc::new(MockSession::new());
    let (runner, _) = runner(session.clone(), &fast_config());
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = runner
        .run(
            &plan(vec![Step::new(1, ActionKind::Click).with_target("#buy")]),
            cancel,
        )
        .await;

    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.error.as_deref(), Some("Run cancelled"));
    assert_eq!(session.performs(), 0);
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_panic_closes_session_then_propagates() {
    let session = Arc::new(MockSession::new().with_handler(|action, _| {
        if let BrowserAction::Click { locator } = action {
            if locator == "#boom" {
                panic!("driver bug");
            }
        }
        Ok(())
    }));
    let (runner, _) = runner(session.clone(), &fast_config());
    let steps = plan(vec![Step::new(1, ActionKind::Click).with_target("#boom")]);

    let handle = tokio::spawn(async move { runner.run(&steps, CancellationToken::new()).await });
    let joined = handle.await;

    assert!(joined.unwrap_err().is_panic());
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_config_wires_policy_and_artifacts() {
    let mut config = fast_config();
    config.engine.on_failure = FailurePolicy::Continue;
    config.engine.default_retries = 0;

    let session = Arc::new(MockSession::new().with_handler(|action, _| match action {
        BrowserAction::Click { locator } if locator == "#bad" => {
            Err(ActionError::Failed("boom".to_string()))
        }
        _ => Ok(()),
    }));
    let capture = Arc::new(MockCapture::new());
    let factory = Arc::new(MockFactory::new(session.clone()));
    let runner = TestRunner::from_config(&config, factory, None, Some(capture.clone()));

    let result = runner
        .run(
            &plan(vec![
                Step::new(1, ActionKind::Click).with_target("#bad"),
                Step::new(2, ActionKind::Click).with_target("#ok"),
            ]),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(result.status, RunStatus::Failed);
    assert_eq!(result.steps.len(), 2);
    assert_eq!(result.steps[0].attempts, 1);
    assert_eq!(result.steps[0].status, StepStatus::Failed);
    assert_eq!(
        result.first_failure.unwrap().screenshot.as_deref(),
        Some("mem://step-1-screenshot")
    );
    assert_eq!(capture.captures(), 1);
}

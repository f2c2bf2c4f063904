//! End-to-end tests for the step execution engine.
//!
//! These drive the full runner (factory, orchestrator, executor, resolver,
//! artifact capture) against scripted sessions and oracles.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use stepwise_config::Config;
use stepwise_engine::{ElementResolver, FsArtifactCapture, TestRunner};
use stepwise_protocols::{
    ActionError, ActionKind, BrowserAction, BrowserSession, Confidence, ElementInfo,
    MatchOracle, MatchRequest, MatchVerdict, OracleError, PageSnapshot, RunStatus, SessionError,
    SessionFactory, Step, StepStatus, Strategy, TestPlan, Verification,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// A tiny in-memory page: `present` locators exist and are visible.
struct FakePage {
    snapshot: PageSnapshot,
    present: Vec<String>,
    performs: Arc<AtomicU32>,
    closed: Arc<AtomicBool>,
    url: Mutex<String>,
}

#[async_trait]
impl BrowserSession for FakePage {
    fn id(&self) -> &str {
        "fake-page"
    }

    async fn snapshot(&self) -> Result<PageSnapshot, ActionError> {
        Ok(self.snapshot.clone())
    }

    async fn perform(&self, action: &BrowserAction, _timeout: Duration) -> Result<(), ActionError> {
        self.performs.fetch_add(1, Ordering::SeqCst);
        let exists = |locator: &str| self.present.iter().any(|p| p == locator);
        match action {
            BrowserAction::Navigate { url } => {
                *self.url.lock().unwrap() = url.clone();
                Ok(())
            }
            BrowserAction::Click { locator }
            | BrowserAction::Hover { locator }
            | BrowserAction::WaitFor { locator }
            | BrowserAction::Type { locator, .. }
            | BrowserAction::Select { locator, .. } => {
                if exists(locator) {
                    Ok(())
                } else {
                    Err(ActionError::ElementNotFound(locator.clone()))
                }
            }
            BrowserAction::Verify(Verification::Visible { locator })
            | BrowserAction::Verify(Verification::Attached { locator }) => {
                if exists(locator) {
                    Ok(())
                } else {
                    Err(ActionError::AssertionFailed(format!("{} is not visible", locator)))
                }
            }
            BrowserAction::Verify(Verification::UrlContains { expected }) => {
                let url = self.url.lock().unwrap().clone();
                if url.contains(expected.as_str()) {
                    Ok(())
                } else {
                    Err(ActionError::AssertionFailed(format!(
                        "expected url to contain '{}', got '{}'",
                        expected, url
                    )))
                }
            }
            _ => Ok(()),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    fn video_path(&self) -> Option<PathBuf> {
        None
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory producing one [`FakePage`] and exposing its counters.
struct FakeFactory {
    snapshot: PageSnapshot,
    present: Vec<String>,
    performs: Arc<AtomicU32>,
    closed: Arc<AtomicBool>,
}

impl FakeFactory {
    fn new(snapshot: PageSnapshot, present: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            snapshot,
            present: present.iter().map(|s| s.to_string()).collect(),
            performs: Arc::new(AtomicU32::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn performs(&self) -> u32 {
        self.performs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        Ok(Box::new(FakePage {
            snapshot: self.snapshot.clone(),
            present: self.present.clone(),
            performs: self.performs.clone(),
            closed: self.closed.clone(),
            url: Mutex::new(String::new()),
        }))
    }
}

/// Oracle that counts calls and either fails or picks a fixed index.
struct CountingOracle {
    calls: AtomicU32,
    pick: Option<usize>,
}

impl CountingOracle {
    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            pick: None,
        })
    }

    fn picking(index: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            pick: Some(index),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchOracle for CountingOracle {
    async fn match_element(&self, _request: &MatchRequest) -> Result<MatchVerdict, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pick {
            Some(index) => Ok(MatchVerdict {
                index,
                confidence: Confidence::Low,
                rationale: "closest candidate".to_string(),
            }),
            None => Err(OracleError::Unavailable(
                "connection reset by upstream-llm-gateway".to_string(),
            )),
        }
    }
}

fn fast_config() -> Config {
    let mut config = Config::default();
    config.engine.backoff_ms = 1;
    config
}

fn login_page() -> PageSnapshot {
    PageSnapshot::new("https://x.test/login", "Sign in")
        .with_element(ElementInfo::new(0, "a").with_text("Home"))
        .with_element(ElementInfo::new(1, "input").with_id("email").with_placeholder("Email"))
        .with_element(ElementInfo::new(2, "button").with_text("Log In"))
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_missing_element_fails_run_with_screenshot() {
    let dir = tempfile::TempDir::new().unwrap();
    let factory = FakeFactory::new(PageSnapshot::default(), &[]);
    let capture = Arc::new(FsArtifactCapture::new(dir.path()));
    let runner = TestRunner::from_config(&fast_config(), factory.clone(), None, Some(capture));

    let plan = TestPlan {
        name: Some("missing element".to_string()),
        steps: vec![
            Step::new(1, ActionKind::Navigate).with_target("https://x.test"),
            Step::new(2, ActionKind::Verify)
                .with_target("#missing")
                .with_assertion("element visible")
                .with_retries(1),
        ],
    };
    let result = runner.run(&plan, CancellationToken::new()).await;

    assert_eq!(result.passed, 1);
    assert_eq!(result.failed, 1);
    assert_eq!(result.status, RunStatus::Failed);
    let step2 = &result.steps[1];
    assert_eq!(step2.attempts, 2);
    let screenshot = step2.screenshot.as_deref().unwrap();
    assert!(std::path::Path::new(screenshot).exists());
    let failure = result.first_failure.unwrap();
    assert_eq!(failure.step_number, 2);
    assert_eq!(failure.screenshot.as_deref(), Some(screenshot));
    assert_eq!(factory.performs(), 3);
}

#[tokio::test]
async fn test_login_button_resolved_without_oracle() {
    let oracle = CountingOracle::picking(1);
    let factory = FakeFactory::new(login_page(), &["text=\"Log In\""]);
    let runner = TestRunner::from_config(&fast_config(), factory, Some(oracle.clone()), None);

    let plan = TestPlan {
        name: None,
        steps: vec![Step::new(1, ActionKind::Click).with_target("the login button")],
    };
    let result = runner.run(&plan, CancellationToken::new()).await;

    assert_eq!(result.status, RunStatus::Passed);
    let resolution = result.steps[0].resolution.as_ref().unwrap();
    assert!(matches!(
        resolution.strategy,
        Strategy::PartialText | Strategy::RoleTextCombo
    ));
    assert!(resolution.confidence >= Confidence::Medium);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_oracle_error_becomes_resolution_not_found() {
    let oracle = CountingOracle::failing();
    let factory = FakeFactory::new(login_page(), &[]);
    let runner = TestRunner::from_config(&fast_config(), factory.clone(), Some(oracle.clone()), None);

    let plan = TestPlan {
        name: None,
        steps: vec![Step::new(1, ActionKind::Click)
            .with_target("the shopping cart icon")
            .with_retries(2)],
    };
    let result = runner.run(&plan, CancellationToken::new()).await;

    assert_eq!(result.status, RunStatus::Failed);
    let step = &result.steps[0];
    assert_eq!(step.status, StepStatus::Failed);
    assert_eq!(step.attempts, 3);
    let error = step.error.as_deref().unwrap();
    assert!(error.starts_with("Could not resolve target"));
    assert!(!error.contains("upstream-llm-gateway"));
    assert_eq!(oracle.calls(), 3);
    assert_eq!(factory.performs(), 0);
}

#[tokio::test]
async fn test_oracle_pick_is_used() {
    let oracle = CountingOracle::picking(2);
    let factory = FakeFactory::new(login_page(), &["#email"]);
    let runner = TestRunner::from_config(&fast_config(), factory, Some(oracle.clone()), None);

    let plan = TestPlan {
        name: None,
        steps: vec![Step::new(1, ActionKind::Click).with_target("the account identifier")],
    };
    let result = runner.run(&plan, CancellationToken::new()).await;

    assert_eq!(result.status, RunStatus::Passed);
    let resolution = result.steps[0].resolution.as_ref().unwrap();
    assert_eq!(resolution.strategy, Strategy::AiMatch);
    assert_eq!(resolution.locator, "#email");
    assert_eq!(oracle.calls(), 1);
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test]
async fn test_performer_invoked_at_most_retries_plus_one() {
    for retries in 0..4 {
        let factory = FakeFactory::new(PageSnapshot::default(), &[]);
        let runner = TestRunner::from_config(&fast_config(), factory.clone(), None, None);
        let plan = TestPlan {
            name: None,
            steps: vec![Step::new(1, ActionKind::Click)
                .with_target("#nowhere")
                .with_retries(retries)],
        };
        let result = runner.run(&plan, CancellationToken::new()).await;
        assert_eq!(factory.performs(), retries + 1);
        assert_eq!(result.steps[0].attempts, retries + 1);
    }
}

#[tokio::test]
async fn test_counts_always_add_up() {
    let factory = FakeFactory::new(PageSnapshot::default(), &["#a"]);
    let mut config = fast_config();
    config.engine.report_unattempted_as_skipped = true;
    config.engine.default_retries = 0;
    let runner = TestRunner::from_config(&config, factory, None, None);

    let plan = TestPlan {
        name: None,
        steps: vec![
            Step::new(1, ActionKind::Click).with_target("#a"),
            Step::new(2, ActionKind::Click).with_target("#b").optional(),
            Step::new(3, ActionKind::Click).with_target("#c"),
            Step::new(4, ActionKind::Click).with_target("#a"),
        ],
    };
    let result = runner.run(&plan, CancellationToken::new()).await;

    assert_eq!(result.passed + result.failed + result.skipped, result.total);
    assert_eq!((result.passed, result.failed, result.skipped), (1, 2, 1));
    assert!(result.is_consistent());
    assert_eq!(result.status, RunStatus::Failed);
}

#[tokio::test]
async fn test_only_optional_failure_is_partial() {
    let factory = FakeFactory::new(PageSnapshot::default(), &[]);
    let runner = TestRunner::from_config(&fast_config(), factory, None, None);
    let plan = TestPlan {
        name: None,
        steps: vec![Step::new(1, ActionKind::Click)
            .with_target("#cookie-banner")
            .with_retries(0)
            .optional()],
    };
    let result = runner.run(&plan, CancellationToken::new()).await;
    assert_eq!(result.status, RunStatus::Partial);
}

#[tokio::test]
async fn test_same_snapshot_same_resolution() {
    let resolver = ElementResolver::new(Config::default().resolver);
    let snapshot = login_page();
    for description in ["the login button", "Home", "email"] {
        let a = resolver.resolve(description, ActionKind::Type, &snapshot).await.unwrap();
        let b = resolver.resolve(description, ActionKind::Type, &snapshot).await.unwrap();
        assert_eq!(a.locator, b.locator);
        assert_eq!(a.strategy, b.strategy);
    }
}

#[tokio::test]
async fn test_plan_json_end_to_end() {
    let raw = r##"{
        "name": "url check",
        "steps": [
            {"step_number": 1, "action": "navigate", "value": "https://x.test/home"},
            {"step_number": 2, "action": "Verify", "expected": "url contains '/home'"},
            {"step_number": 3, "action": "drag", "target": "#card", "optional": true}
        ]
    }"##;
    let plan = TestPlan::from_json(raw).unwrap();
    let factory = FakeFactory::new(PageSnapshot::default(), &[]);
    let runner = TestRunner::from_config(&fast_config(), factory, None, None);
    let result = runner.run(&plan, CancellationToken::new()).await;

    assert_eq!(result.passed, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.status, RunStatus::Partial);
    assert!(result.steps[2]
        .error
        .as_deref()
        .unwrap()
        .contains("Unsupported action"));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "partial");
    assert_eq!(json["steps"][0]["status"], "passed");
}

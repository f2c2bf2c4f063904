//! Hand-written collaborator mocks for unit tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use stepwise_protocols::{
    ActionError, ArtifactCapture, ArtifactError, ArtifactKind, ArtifactRef, BrowserAction,
    BrowserSession, PageSnapshot, SessionError, SessionFactory,
};

type Handler = Box<dyn Fn(&BrowserAction, u32) -> Result<(), ActionError> + Send + Sync>;

/// Scriptable browser session that counts every call.
pub(crate) struct MockSession {
    snapshot: Mutex<PageSnapshot>,
    handler: Handler,
    delay: Option<Duration>,
    performs: AtomicU32,
    snapshots: AtomicU32,
    screenshots: AtomicU32,
    closed: AtomicBool,
    fail_close: bool,
    fail_screenshot: bool,
    video: Option<PathBuf>,
    actions: Mutex<Vec<BrowserAction>>,
}

impl MockSession {
    pub const PNG: &'static [u8] = b"\x89PNG\r\n\x1a\nmock";

    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(PageSnapshot::default()),
            handler: Box::new(|_, _| Ok(())),
            delay: None,
            performs: AtomicU32::new(0),
            snapshots: AtomicU32::new(0),
            screenshots: AtomicU32::new(0),
            closed: AtomicBool::new(false),
            fail_close: false,
            fail_screenshot: false,
            video: None,
            actions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_snapshot(self, snapshot: PageSnapshot) -> Self {
        *self.snapshot.lock().unwrap() = snapshot;
        self
    }

    /// `handler` receives the action and the 1-based call number.
    pub fn with_handler(
        mut self,
        handler: impl Fn(&BrowserAction, u32) -> Result<(), ActionError> + Send + Sync + 'static,
    ) -> Self {
        self.handler = Box::new(handler);
        self
    }

    /// Fail the first `n` performs.
    pub fn failing_first(self, n: u32) -> Self {
        self.with_handler(move |action, call| {
            if call <= n {
                Err(ActionError::Failed(format!("{} failed (call {})", action, call)))
            } else {
                Ok(())
            }
        })
    }

    /// Sleep inside every perform.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn failing_screenshot(mut self) -> Self {
        self.fail_screenshot = true;
        self
    }

    pub fn with_video(mut self, path: impl Into<PathBuf>) -> Self {
        self.video = Some(path.into());
        self
    }

    pub fn performs(&self) -> u32 {
        self.performs.load(Ordering::SeqCst)
    }

    pub fn snapshots(&self) -> u32 {
        self.snapshots.load(Ordering::SeqCst)
    }

    pub fn screenshots(&self) -> u32 {
        self.screenshots.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<BrowserAction> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    fn id(&self) -> &str {
        "mock"
    }

    async fn snapshot(&self) -> Result<PageSnapshot, ActionError> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn perform(&self, action: &BrowserAction, _timeout: Duration) -> Result<(), ActionError> {
        let call = self.performs.fetch_add(1, Ordering::SeqCst) + 1;
        self.actions.lock().unwrap().push(action.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(action, call)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        self.screenshots.fetch_add(1, Ordering::SeqCst);
        if self.fail_screenshot {
            return Err(ActionError::Failed("screenshot unavailable".to_string()));
        }
        Ok(Self::PNG.to_vec())
    }

    fn video_path(&self) -> Option<PathBuf> {
        self.video.clone()
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(SessionError::TeardownFailed("browser did not exit".to_string()));
        }
        Ok(())
    }
}

/// Session handle shared between a test and the runner that owns it.
pub(crate) struct SharedSession(pub Arc<MockSession>);

#[async_trait]
impl BrowserSession for SharedSession {
    fn id(&self) -> &str {
        self.0.id()
    }

    async fn snapshot(&self) -> Result<PageSnapshot, ActionError> {
        self.0.snapshot().await
    }

    async fn perform(&self, action: &BrowserAction, timeout: Duration) -> Result<(), ActionError> {
        self.0.perform(action, timeout).await
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        self.0.screenshot().await
    }

    fn video_path(&self) -> Option<PathBuf> {
        self.0.video_path()
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.0.close().await
    }
}

/// Factory handing out one prepared session, or failing to launch.
pub(crate) struct MockFactory {
    session: Mutex<Option<Arc<MockSession>>>,
    opens: AtomicU32,
}

impl MockFactory {
    pub fn new(session: Arc<MockSession>) -> Self {
        Self {
            session: Mutex::new(Some(session)),
            opens: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            session: Mutex::new(None),
            opens: AtomicU32::new(0),
        }
    }

    pub fn opens(&self) -> u32 {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.session.lock().unwrap().take() {
            Some(session) => Ok(Box::new(SharedSession(session))),
            None => Err(SessionError::LaunchFailed("chrome not found".to_string())),
        }
    }
}

/// Artifact capture that returns a fixed reference, or always fails.
pub(crate) struct MockCapture {
    fail: bool,
    captures: AtomicU32,
}

impl MockCapture {
    pub fn new() -> Self {
        Self {
            fail: false,
            captures: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            captures: AtomicU32::new(0),
        }
    }

    pub fn captures(&self) -> u32 {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactCapture for MockCapture {
    async fn capture(
        &self,
        _session: &dyn BrowserSession,
        step_number: u32,
        kind: ArtifactKind,
    ) -> Result<Option<ArtifactRef>, ArtifactError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ArtifactError::Capture("disk full".to_string()));
        }
        Ok(Some(format!("mem://step-{}-{}", step_number, kind)))
    }
}

//! [`BrowserSession`] over a CDP page.
//!
//! Element actions auto-wait: the locator is probed every
//! [`POLL_INTERVAL`] until the element is ready or the action's timeout
//! elapses. Verifications poll the same way and fail with the last observed
//! state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use stepwise_protocols::{
    ActionError, BrowserAction, BrowserSession, PageSnapshot, SessionError, Verification,
};

use crate::cdp::{CdpClient, CdpError, KeyChord, PageSession};
use crate::launcher::ChromeProcess;
use crate::scripts::{self, Probe, SelectOutcome};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Longest excerpt of observed text quoted in an assertion failure.
const EXCERPT_LIMIT: usize = 120;

/// One page in one browser, owned by a single run.
pub struct CdpBrowserSession {
    id: String,
    client: CdpClient,
    page: PageSession,
    process: Mutex<Option<ChromeProcess>>,
    closed: AtomicBool,
}

impl CdpBrowserSession {
    pub fn new(client: CdpClient, page: PageSession, process: Option<ChromeProcess>) -> Self {
        Self {
            id: format!("page-{}", page.target_id()),
            client,
            page,
            process: Mutex::new(process),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), ActionError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ActionError::SessionClosed);
        }
        Ok(())
    }

    async fn probe(&self, locator: &str) -> Result<Option<Probe>, ActionError> {
        match self.page.evaluate(&scripts::probe(locator)).await {
            Ok(value) => scripts::decode(value)
                .map(Some)
                .map_err(|e| ActionError::Failed(format!("unreadable probe result: {}", e))),
            Err(CdpError::JavaScript(msg)) => {
                Err(ActionError::Failed(format!("invalid locator '{}': {}", locator, msg)))
            }
            // The execution context goes away during navigation; try again next tick.
            Err(CdpError::Protocol { message, .. }) => {
                debug!("Probe for '{}' interrupted: {}", locator, message);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Poll `locator` until `ready` holds or `deadline` passes.
    ///
    /// Returns the last probe and whether it was ready.
    async fn wait_for(
        &self,
        locator: &str,
        deadline: Instant,
        ready: impl Fn(&Probe) -> bool,
    ) -> Result<(Option<Probe>, bool), ActionError> {
        let mut last = None;
        loop {
            if let Some(probe) = self.probe(locator).await? {
                if ready(&probe) {
                    return Ok((Some(probe), true));
                }
                last = Some(probe);
            }
            if !sleep_until_next_poll(deadline).await {
                return Ok((last, false));
            }
        }
    }

    /// Wait until the element can receive input and return its center.
    async fn wait_actionable(
        &self,
        locator: &str,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<Probe, ActionError> {
        match self.wait_for(locator, deadline, Probe::actionable).await? {
            (Some(probe), true) => Ok(probe),
            (Some(probe), false) if probe.attached() => Err(ActionError::Timeout(format!(
                "'{}' was not visible and enabled within {}ms",
                locator,
                timeout.as_millis()
            ))),
            _ => Err(ActionError::ElementNotFound(format!(
                "{} (waited {}ms)",
                locator,
                timeout.as_millis()
            ))),
        }
    }

    async fn verify(&self, check: &Verification, deadline: Instant) -> Result<(), ActionError> {
        match check {
            Verification::Attached { locator } => {
                let (_, ok) = self.wait_for(locator, deadline, Probe::attached).await?;
                assert_that(ok, || format!("{} is not attached", locator))
            }
            Verification::Visible { locator } => {
                let (last, ok) = self
                    .wait_for(locator, deadline, |p| p.attached() && p.visible)
                    .await?;
                assert_that(ok, || match last {
                    Some(p) if p.attached() => format!("{} is attached but not visible", locator),
                    _ => format!("{} is not on the page", locator),
                })
            }
            Verification::Hidden { locator } => {
                let (_, ok) = self
                    .wait_for(locator, deadline, |p| !p.attached() || !p.visible)
                    .await?;
                assert_that(ok, || format!("{} is still visible", locator))
            }
            Verification::TextContains { locator, expected } => {
                let mut observed = None;
                loop {
                    observed = self.read_text(locator.as_deref()).await?.or(observed);
                    if observed.as_deref().is_some_and(|t| t.contains(expected.as_str())) {
                        return Ok(());
                    }
                    if !sleep_until_next_poll(deadline).await {
                        break;
                    }
                }
                let scope = locator.as_deref().unwrap_or("page");
                Err(ActionError::AssertionFailed(match observed {
                    Some(text) => format!(
                        "{} text does not contain '{}' (found '{}')",
                        scope,
                        expected,
                        excerpt(&text)
                    ),
                    None => format!("{} not found while looking for text '{}'", scope, expected),
                }))
            }
            Verification::UrlContains { expected } => {
                let mut url = String::new();
                loop {
                    if let Ok(current) = self.page.url().await {
                        url = current;
                    }
                    if url.contains(expected.as_str()) {
                        return Ok(());
                    }
                    if !sleep_until_next_poll(deadline).await {
                        break;
                    }
                }
                Err(ActionError::AssertionFailed(format!(
                    "url '{}' does not contain '{}'",
                    url, expected
                )))
            }
        }
    }

    /// Text of the element or page; `None` while the element is missing.
    async fn read_text(&self, locator: Option<&str>) -> Result<Option<String>, ActionError> {
        match self.page.evaluate(&scripts::text_of(locator)).await {
            Ok(value) => Ok(value.as_str().map(str::to_string)),
            Err(CdpError::Protocol { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn type_into(
        &self,
        locator: &str,
        text: &str,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        self.wait_actionable(locator, deadline, timeout).await?;
        let focused = self.page.evaluate(&scripts::focus_and_clear(locator)).await?;
        if focused.as_bool() != Some(true) {
            return Err(ActionError::Detached(locator.to_string()));
        }
        self.page.insert_text(text).await?;
        Ok(())
    }

    async fn select(
        &self,
        locator: &str,
        value: &str,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        self.wait_actionable(locator, deadline, timeout).await?;
        let outcome = self.page.evaluate(&scripts::select_option(locator, value)).await?;
        match scripts::decode::<SelectOutcome>(outcome) {
            Ok(SelectOutcome::Ok) => Ok(()),
            Ok(SelectOutcome::Missing) => Err(ActionError::Detached(locator.to_string())),
            Ok(SelectOutcome::NotSelect) => Err(ActionError::Failed(format!(
                "{} is not a <select> element",
                locator
            ))),
            Ok(SelectOutcome::NoOption) => Err(ActionError::Failed(format!(
                "{} has no option '{}'",
                locator, value
            ))),
            Err(e) => Err(ActionError::Failed(format!("unreadable select result: {}", e))),
        }
    }

    async fn press(
        &self,
        locator: Option<&str>,
        key: &str,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        let chord = KeyChord::parse(key)
            .ok_or_else(|| ActionError::Failed(format!("unknown key '{}'", key)))?;
        if let Some(locator) = locator {
            let probe = self.wait_actionable(locator, deadline, timeout).await?;
            self.page.click(probe.x, probe.y).await?;
        }
        self.page.press_key(&chord).await?;
        Ok(())
    }
}

/// Sleep one poll interval, capped at `deadline`. Returns `false` once the
/// deadline has already passed.
async fn sleep_until_next_poll(deadline: Instant) -> bool {
    let now = Instant::now();
    if now >= deadline {
        return false;
    }
    tokio::time::sleep_until((now + POLL_INTERVAL).min(deadline)).await;
    true
}

fn assert_that(ok: bool, message: impl FnOnce() -> String) -> Result<(), ActionError> {
    if ok {
        Ok(())
    } else {
        Err(ActionError::AssertionFailed(message()))
    }
}

fn excerpt(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= EXCERPT_LIMIT {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(EXCERPT_LIMIT).collect();
    format!("{}...", cut)
}

#[async_trait]
impl BrowserSession for CdpBrowserSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn snapshot(&self) -> Result<PageSnapshot, ActionError> {
        self.ensure_open()?;
        let value = self.page.evaluate(&scripts::inventory()).await?;
        let snapshot: PageSnapshot = scripts::decode(value)
            .map_err(|e| ActionError::Failed(format!("unreadable page inventory: {}", e)))?;
        debug!(
            "Snapshot of {}: {} element(s)",
            snapshot.url,
            snapshot.elements.len()
        );
        Ok(snapshot)
    }

    async fn perform(&self, action: &BrowserAction, timeout: Duration) -> Result<(), ActionError> {
        self.ensure_open()?;
        let deadline = Instant::now() + timeout;
        debug!("Session {}: {}", self.id, action);

        match action {
            BrowserAction::Navigate { url } => match self.page.navigate(url, timeout).await {
                Err(CdpError::Protocol { message, .. }) => {
                    Err(ActionError::Failed(format!("navigate to {}: {}", url, message)))
                }
                other => other.map_err(ActionError::from),
            },
            BrowserAction::Click { locator } => {
                let probe = self.wait_actionable(locator, deadline, timeout).await?;
                self.page.click(probe.x, probe.y).await?;
                Ok(())
            }
            BrowserAction::Hover { locator } => {
                let probe = self.wait_actionable(locator, deadline, timeout).await?;
                self.page.mouse_move(probe.x, probe.y).await?;
                Ok(())
            }
            BrowserAction::Type { locator, text } => {
                self.type_into(locator, text, deadline, timeout).await
            }
            BrowserAction::Select { locator, value } => {
                self.select(locator, value, deadline, timeout).await
            }
            BrowserAction::Press { locator, key } => {
                self.press(locator.as_deref(), key, deadline, timeout).await
            }
            BrowserAction::WaitFor { locator } => {
                match self
                    .wait_for(locator, deadline, |p| p.attached() && p.visible)
                    .await?
                {
                    (_, true) => Ok(()),
                    _ => Err(ActionError::Timeout(format!(
                        "'{}' did not appear within {}ms",
                        locator,
                        timeout.as_millis()
                    ))),
                }
            }
            BrowserAction::Sleep { duration_ms } => {
                tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
                Ok(())
            }
            BrowserAction::Verify(check) => self.verify(check, deadline).await,
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ActionError> {
        self.ensure_open()?;
        Ok(self.page.screenshot_png().await?)
    }

    async fn close(&self) -> Result<(), SessionError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let process = self.process.lock().await.take();
        match process {
            Some(process) => {
                if let Err(e) = self.client.close_browser().await {
                    warn!("Browser.close failed, killing process: {}", e);
                }
                self.client.disconnect().await;
                process.shutdown().await?;
            }
            None => {
                let closed = self.client.close_page(self.page.target_id()).await;
                self.client.disconnect().await;
                closed.map_err(|e| SessionError::TeardownFailed(e.to_string()))?;
            }
        }

        debug!("Session {} closed", self.id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

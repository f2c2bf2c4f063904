//! Primitive browser actions handed to a [`BrowserSession`](crate::BrowserSession).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ActionKind;

/// A verification assertion, already classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Verification {
    /// Element exists in the DOM.
    Attached { locator: String },
    /// Element exists and is rendered.
    Visible { locator: String },
    /// Element is absent or not rendered.
    Hidden { locator: String },
    /// Element text (or whole page text when no locator) contains `expected`.
    TextContains {
        locator: Option<String>,
        expected: String,
    },
    /// Current URL contains `expected`.
    UrlContains { expected: String },
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Attached { locator } => write!(f, "{} is attached", locator),
            Verification::Visible { locator } => write!(f, "{} is visible", locator),
            Verification::Hidden { locator } => write!(f, "{} is hidden", locator),
            Verification::TextContains {
                locator: Some(locator),
                expected,
            } => write!(f, "{} contains text '{}'", locator, expected),
            Verification::TextContains {
                locator: None,
                expected,
            } => write!(f, "page contains text '{}'", expected),
            Verification::UrlContains { expected } => write!(f, "url contains '{}'", expected),
        }
    }
}

/// One primitive action against the live page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BrowserAction {
    Navigate { url: String },
    Click { locator: String },
    Type { locator: String, text: String },
    WaitFor { locator: String },
    Sleep { duration_ms: u64 },
    Hover { locator: String },
    Select { locator: String, value: String },
    Press { locator: Option<String>, key: String },
    Verify(Verification),
}

impl BrowserAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            BrowserAction::Navigate { .. } => ActionKind::Navigate,
            BrowserAction::Click { .. } => ActionKind::Click,
            BrowserAction::Type { .. } => ActionKind::Type,
            BrowserAction::WaitFor { .. } | BrowserAction::Sleep { .. } => ActionKind::Wait,
            BrowserAction::Hover { .. } => ActionKind::Hover,
            BrowserAction::Select { .. } => ActionKind::Select,
            BrowserAction::Press { .. } => ActionKind::Press,
            BrowserAction::Verify(_) => ActionKind::Verify,
        }
    }
}

impl fmt::Display for BrowserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserAction::Navigate { url } => write!(f, "navigate to {}", url),
            BrowserAction::Click { locator } => write!(f, "click {}", locator),
            BrowserAction::Type { locator, text } => {
                write!(f, "type {} chars into {}", text.chars().count(), locator)
            }
            BrowserAction::WaitFor { locator } => write!(f, "wait for {}", locator),
            BrowserAction::Sleep { duration_ms } => write!(f, "wait {}ms", duration_ms),
            BrowserAction::Hover { locator } => write!(f, "hover {}", locator),
            BrowserAction::Select { locator, value } => {
                write!(f, "select '{}' in {}", value, locator)
            }
            BrowserAction::Press {
                locator: Some(locator),
                key,
            } => write!(f, "press {} on {}", key, locator),
            BrowserAction::Press { locator: None, key } => write!(f, "press {}", key),
            BrowserAction::Verify(check) => write!(f, "verify {}", check),
        }
    }
}

//! Test plan steps as emitted by the external planner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of actions the engine knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Navigate,
    Click,
    Type,
    Wait,
    Verify,
    Hover,
    Select,
    Press,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Navigate,
        ActionKind::Click,
        ActionKind::Type,
        ActionKind::Wait,
        ActionKind::Verify,
        ActionKind::Hover,
        ActionKind::Select,
        ActionKind::Press,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Click => "click",
            ActionKind::Type => "type",
            ActionKind::Wait => "wait",
            ActionKind::Verify => "verify",
            ActionKind::Hover => "hover",
            ActionKind::Select => "select",
            ActionKind::Press => "press",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Actions that put text into a field.
    pub fn is_text_entry(&self) -> bool {
        matches!(self, ActionKind::Type)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action named by a step.
///
/// Unknown names still deserialize so that a plan with one bad step can run;
/// the executor fails that step with an unsupported-action error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepAction {
    Known(ActionKind),
    Unsupported(String),
}

impl StepAction {
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            StepAction::Known(kind) => Some(*kind),
            StepAction::Unsupported(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StepAction::Known(kind) => kind.as_str(),
            StepAction::Unsupported(name) => name,
        }
    }
}

impl From<ActionKind> for StepAction {
    fn from(kind: ActionKind) -> Self {
        StepAction::Known(kind)
    }
}

impl From<String> for StepAction {
    fn from(raw: String) -> Self {
        match ActionKind::parse(&raw) {
            Some(kind) => StepAction::Known(kind),
            None => StepAction::Unsupported(raw),
        }
    }
}

impl From<StepAction> for String {
    fn from(action: StepAction) -> Self {
        action.name().to_string()
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a step's target should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef<'a> {
    /// Structural locator handed to the browser as-is.
    Locator(&'a str),
    /// Free-text description that needs the element resolver.
    Description(&'a str),
}

/// One declarative step. Never mutated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    #[serde(alias = "step_number")]
    pub number: u32,

    pub action: StepAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, alias = "value", skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(default, alias = "expected", skip_serializing_if = "Option::is_none")]
    pub assertion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    #[serde(default)]
    pub optional: bool,
}

impl Step {
    pub fn new(number: u32, action: impl Into<StepAction>) -> Self {
        Self {
            number,
            action: action.into(),
            target: None,
            data: None,
            assertion: None,
            timeout_ms: None,
            retries: None,
            optional: false,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_assertion(mut self, assertion: impl Into<String>) -> Self {
        self.assertion = Some(assertion.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Classify the target, ignoring blank strings.
    pub fn target_ref(&self) -> Option<TargetRef<'_>> {
        let target = self.target.as_deref()?.trim();
        if target.is_empty() {
            None
        } else if is_structural_locator(target) {
            Some(TargetRef::Locator(target))
        } else {
            Some(TargetRef::Description(target))
        }
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

impl TestPlan {
    /// Parse a plan document; a bare JSON array of steps is also accepted.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PlanDocument {
            Plan(TestPlan),
            Steps(Vec<Step>),
        }

        Ok(match serde_json::from_str::<PlanDocument>(raw)? {
            PlanDocument::Plan(plan) => plan,
            PlanDocument::Steps(steps) => TestPlan { name: None, steps },
        })
    }
}

const LOCATOR_PREFIXES: [&str; 6] = ["css=", "xpath=", "text=", "id=", "//", "(//"];

/// Whether a target string is already a structural locator rather than a
/// human description.
///
/// Recognized forms: `#id`, `.class`, `[attr=...]`, engine prefixes
/// (`css=`, `xpath=`, `text=`, `id=`), XPath, and compound selectors that
/// start with a lowercase tag name (`button.primary`, `input[name=q]`).
pub fn is_structural_locator(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() {
        return false;
    }
    if LOCATOR_PREFIXES.iter().any(|p| s.starts_with(p)) {
        return true;
    }
    if matches!(s.chars().next(), Some('#' | '.' | '[')) {
        return s.len() > 1;
    }

    let Some(split) = s.find(['#', '.', '[', ':']) else {
        // Plain tag chains such as `form > button`.
        return s.contains('>')
            && s.split_whitespace().all(|token| {
                token == ">" || token.chars().all(|c| c.is_ascii_lowercase() || c == '-')
            });
    };
    let (tag, rest) = s.split_at(split);
    let tag_ok = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let has_spaces = s.chars().any(char::is_whitespace);

    tag_ok && rest.len() > 1 && (!has_spaces || s.contains(']') || s.contains('>'))
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;

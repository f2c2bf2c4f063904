//! Mapping from a declarative step to one primitive browser action.

use stepwise_protocols::{ActionKind, BrowserAction, Step, StepError, TargetRef};

use crate::assertion::{classify, is_url_assertion};

/// Whether the step's target has to be turned into a locator before acting.
///
/// Navigate targets are URLs, and URL assertions ignore the target.
pub fn needs_locator(step: &Step, kind: ActionKind) -> bool {
    if step.target_ref().is_none() {
        return false;
    }
    match kind {
        ActionKind::Navigate => false,
        ActionKind::Verify => !is_url_assertion(step.assertion.as_deref()),
        _ => true,
    }
}

/// Build the browser action for `step`, given its resolved locator.
pub fn to_browser_action(
    step: &Step,
    kind: ActionKind,
    locator: Option<&str>,
) -> Result<BrowserAction, StepError> {
    let data = step.data.as_deref();

    let action = match kind {
        ActionKind::Navigate => {
            let url = match step.target_ref() {
                Some(TargetRef::Locator(t) | TargetRef::Description(t)) => Some(t),
                None => data.map(str::trim).filter(|d| !d.is_empty()),
            };
            BrowserAction::Navigate {
                url: url.ok_or_else(|| missing(step, "a URL"))?.to_string(),
            }
        }
        ActionKind::Click => BrowserAction::Click {
            locator: required(step, locator)?,
        },
        ActionKind::Hover => BrowserAction::Hover {
            locator: required(step, locator)?,
        },
        ActionKind::Type => BrowserAction::Type {
            locator: required(step, locator)?,
            text: data.ok_or_else(|| missing(step, "text to type"))?.to_string(),
        },
        ActionKind::Select => BrowserAction::Select {
            locator: required(step, locator)?,
            value: data.ok_or_else(|| missing(step, "an option to select"))?.to_string(),
        },
        ActionKind::Press => BrowserAction::Press {
            locator: locator.map(str::to_string),
            key: data
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .ok_or_else(|| missing(step, "a key"))?
                .to_string(),
        },
        ActionKind::Wait => match locator {
            Some(locator) => BrowserAction::WaitFor {
                locator: locator.to_string(),
            },
            None => {
                let raw = data.map(str::trim).ok_or_else(|| missing(step, "a target or a duration"))?;
                let duration_ms = raw.parse::<u64>().map_err(|_| {
                    StepError::InvalidStep(format!(
                        "step {}: wait duration '{}' is not a number of milliseconds",
                        step.number, raw
                    ))
                })?;
                BrowserAction::Sleep { duration_ms }
            }
        },
        ActionKind::Verify => {
            BrowserAction::Verify(classify(step.assertion.as_deref(), data, locator)?)
        }
    };

    Ok(action)
}

fn required(step: &Step, locator: Option<&str>) -> Result<String, StepError> {
    locator
        .map(str::to_string)
        .ok_or_else(|| missing(step, "a target"))
}

fn missing(step: &Step, what: &str) -> StepError {
    StepError::InvalidStep(format!(
        "step {} ({}) needs {}",
        step.number,
        step.action.name(),
        what
    ))
}

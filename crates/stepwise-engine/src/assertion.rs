//! Classification of free-text verify assertions.

use std::sync::LazyLock;

use regex::Regex;

use stepwise_protocols::{StepError, Verification};

static DOUBLE_QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"["“]([^"”]+)["”]"#).ok());

static SINGLE_QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)'([^']+)'(?:$|[\s.,;:!?])").ok());

/// First quoted substring in `text`. Double quotes win over single quotes.
pub fn quoted_substring(text: &str) -> Option<String> {
    [&DOUBLE_QUOTED, &SINGLE_QUOTED]
        .into_iter()
        .filter_map(|re| re.as_ref())
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.trim().is_empty())
}

/// Whether the assertion is a URL check, which never needs a target.
pub fn is_url_assertion(assertion: Option<&str>) -> bool {
    matches!(keyword(assertion), Some(Keyword::Url))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Hidden,
    Visible,
    Text,
    Url,
}

/// `text` with every quoted span blanked out, so the expected value never
/// decides which check runs.
fn outside_quotes(text: &str) -> String {
    [&DOUBLE_QUOTED, &SINGLE_QUOTED]
        .into_iter()
        .filter_map(|re| re.as_ref())
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned())
}

fn keyword(assertion: Option<&str>) -> Option<Keyword> {
    let lower = outside_quotes(assertion?).to_lowercase();
    if lower.contains("hidden") || lower.contains("not visible") {
        Some(Keyword::Hidden)
    } else if lower.contains("visible") {
        Some(Keyword::Visible)
    } else if lower.contains("text") {
        Some(Keyword::Text)
    } else if lower.contains("url") {
        Some(Keyword::Url)
    } else {
        None
    }
}

/// Classify a verify step into one concrete check.
///
/// `data` is the fallback expected value for text and URL checks.
pub fn classify(
    assertion: Option<&str>,
    data: Option<&str>,
    locator: Option<&str>,
) -> Result<Verification, StepError> {
    let assertion = assertion.map(str::trim).filter(|a| !a.is_empty());
    let data = data.map(str::trim).filter(|d| !d.is_empty());
    let expected = || {
        assertion
            .and_then(quoted_substring)
            .or_else(|| data.map(str::to_string))
    };

    let Some(text) = assertion else {
        return Ok(Verification::Attached {
            locator: require_locator(locator, "an existence check")?,
        });
    };

    match keyword(Some(text)) {
        Some(Keyword::Hidden) => Ok(Verification::Hidden {
            locator: require_locator(locator, "a hidden check")?,
        }),
        Some(Keyword::Visible) => Ok(Verification::Visible {
            locator: require_locator(locator, "a visibility check")?,
        }),
        Some(Keyword::Text) => match expected() {
            Some(expected) => Ok(Verification::TextContains {
                locator: locator.map(str::to_string),
                expected,
            }),
            None => Err(StepError::InvalidStep(format!(
                "text assertion '{}' has no expected value: quote it or set data",
                text
            ))),
        },
        Some(Keyword::Url) => match expected() {
            Some(expected) => Ok(Verification::UrlContains { expected }),
            None => Err(StepError::InvalidStep(format!(
                "url assertion '{}' has no expected value: quote it or set data",
                text
            ))),
        },
        None => match quoted_substring(text) {
            Some(expected) => Ok(Verification::TextContains {
                locator: locator.map(str::to_string),
                expected,
            }),
            None => Ok(Verification::Attached {
                locator: require_locator(locator, "an existence check")?,
            }),
        },
    }
}

fn require_locator(locator: Option<&str>, what: &str) -> Result<String, StepError> {
    locator
        .map(str::to_string)
        .ok_or_else(|| StepError::InvalidStep(format!("{} needs a target", what)))
}

#[cfg(test)]
#[path = "assertion_tests.rs"]
mod tests;

//! Element resolution results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which resolution strategy produced a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Literal,
    ExactText,
    PartialText,
    AriaLabel,
    Placeholder,
    RoleTextCombo,
    AiMatch,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Literal => "literal",
            Strategy::ExactText => "exact-text",
            Strategy::PartialText => "partial-text",
            Strategy::AriaLabel => "aria-label",
            Strategy::Placeholder => "placeholder",
            Strategy::RoleTextCombo => "role-text-combo",
            Strategy::AiMatch => "ai-match",
        }
    }

    /// Strategies that never consult the oracle.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Strategy::AiMatch)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse quality label attached to a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }

    /// One tier down, saturating at low.
    pub fn lowered(self) -> Self {
        match self {
            Confidence::High => Confidence::Medium,
            Confidence::Medium | Confidence::Low => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        })
    }
}

/// A concrete locator for a described element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub locator: String,
    pub strategy: Strategy,
    pub confidence: Confidence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl Resolution {
    pub fn new(locator: impl Into<String>, strategy: Strategy, confidence: Confidence) -> Self {
        Self {
            locator: locator.into(),
            strategy,
            confidence,
            rationale: None,
        }
    }

    /// Literal fast path: the target already is a locator.
    pub fn literal(locator: impl Into<String>) -> Self {
        Self::new(locator, Strategy::Literal, Confidence::High)
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

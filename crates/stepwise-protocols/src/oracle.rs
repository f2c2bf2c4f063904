//! AI-matching oracle contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;
use crate::types::{ActionKind, Confidence, ElementInfo};

/// Normalized view of one candidate element sent to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleCandidate {
    /// 1-based position in the candidate list.
    pub index: usize,
    pub tag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    pub visible: bool,
}

impl OracleCandidate {
    /// Normalize an element: collapse whitespace, cap text length, drop blanks.
    pub fn from_element(index: usize, element: &ElementInfo, max_text: usize) -> Self {
        let collapse = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        let text = collapse(&element.text);
        let text = if text.chars().count() > max_text {
            let mut cut: String = text.chars().take(max_text).collect();
            cut.push('…');
            cut
        } else {
            text
        };

        Self {
            index,
            tag: element.tag.clone(),
            text,
            aria_label: element.accessible_label().map(collapse),
            placeholder: element.placeholder().map(collapse),
            role: element.effective_role(),
            id: element.id().map(str::to_string),
            name: element.name().map(str::to_string),
            input_type: element.input_type().map(str::to_string),
            visible: element.visible,
        }
    }
}

/// Everything the oracle sees for one resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    pub description: String,
    pub action: ActionKind,
    pub candidates: Vec<OracleCandidate>,
    pub page_title: String,
    pub page_url: String,
}

/// The oracle's pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchVerdict {
    /// 1-based index into [`MatchRequest::candidates`].
    pub index: usize,
    pub confidence: Confidence,
    pub rationale: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVerdict {
    index: i64,
    confidence: String,
    #[serde(default)]
    rationale: String,
}

impl MatchVerdict {
    /// Parse a strict JSON verdict: `{"index": n, "confidence": "...", "rationale": "..."}`.
    ///
    /// A surrounding Markdown code fence is tolerated; anything else is rejected.
    pub fn parse_strict(raw: &str) -> Result<Self, OracleError> {
        let body = strip_code_fence(raw.trim());
        let parsed: RawVerdict = serde_json::from_str(body)
            .map_err(|e| OracleError::InvalidResponse(format!("{}: {}", e, preview(body))))?;

        if parsed.index < 1 {
            return Err(OracleError::InvalidResponse(format!(
                "index must be 1-based, got {}",
                parsed.index
            )));
        }
        let confidence = Confidence::parse(&parsed.confidence).ok_or_else(|| {
            OracleError::InvalidResponse(format!("unknown confidence '{}'", parsed.confidence))
        })?;

        Ok(Self {
            index: parsed.index as usize,
            confidence,
            rationale: parsed.rationale.trim().to_string(),
        })
    }
}

fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn preview(body: &str) -> String {
    body.chars().take(120).collect()
}

/// External matcher consulted only when every deterministic strategy misses.
///
/// Treated as untrusted, possibly slow and possibly unavailable.
#[async_trait]
pub trait MatchOracle: Send + Sync {
    async fn match_element(&self, request: &MatchRequest) -> Result<MatchVerdict, OracleError>;
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod tests;

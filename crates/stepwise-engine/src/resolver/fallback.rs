//! Last-resort matching through the injected oracle.

use tracing::{debug, warn};

use stepwise_protocols::{
    ActionKind, ElementInfo, MatchRequest, OracleCandidate, OracleError, PageSnapshot, Resolution,
    Strategy,
};

use super::{generate_selector, ElementResolver};

impl ElementResolver {
    /// Ask the oracle to pick among the first candidates in document order.
    ///
    /// Every failure (transport, parse, out-of-range pick) is logged and
    /// reported as no match.
    pub(super) async fn ask_oracle(
        &self,
        description: &str,
        action: ActionKind,
        snapshot: &PageSnapshot,
    ) -> Option<Resolution> {
        let oracle = self.oracle.as_ref()?;

        let pool: Vec<&ElementInfo> = snapshot
            .elements
            .iter()
            .take(self.config.max_oracle_candidates)
            .collect();
        if pool.is_empty() {
            debug!("No candidates to offer the oracle for '{}'", description);
            return None;
        }

        let request = MatchRequest {
            description: description.to_string(),
            action,
            candidates: pool
                .iter()
                .enumerate()
                .map(|(i, el)| {
                    OracleCandidate::from_element(i + 1, el, self.config.candidate_text_limit)
                })
                .collect(),
            page_title: snapshot.title.clone(),
            page_url: snapshot.url.clone(),
        };

        let verdict = match oracle.match_element(&request).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Oracle match for '{}' failed: {}", description, e);
                return None;
            }
        };

        let Some(element) = verdict.index.checked_sub(1).and_then(|i| pool.get(i)) else {
            let err = OracleError::OutOfRange {
                index: verdict.index,
                count: pool.len(),
            };
            warn!("Oracle match for '{}' rejected: {}", description, err);
            return None;
        };

        let resolution = Resolution::new(
            generate_selector(element, self.config.short_text_limit),
            Strategy::AiMatch,
            verdict.confidence,
        );
        Some(if verdict.rationale.is_empty() {
            resolution
        } else {
            resolution.with_rationale(verdict.rationale)
        })
    }
}

//! Element resolution: literal fast path, deterministic cascade, oracle fallback.

mod cascade;
mod fallback;
mod selector;
mod text;

use std::sync::Arc;

use tracing::debug;

use stepwise_config::ResolverConfig;
use stepwise_protocols::{
    is_structural_locator, ActionKind, MatchOracle, PageSnapshot, Resolution, StepError,
};

pub use selector::generate_selector;

/// Turns a target description into a concrete locator.
pub struct ElementResolver {
    config: ResolverConfig,
    oracle: Option<Arc<dyn MatchOracle>>,
}

impl ElementResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            oracle: None,
        }
    }

    /// Attach the matcher consulted when every deterministic strategy misses.
    pub fn with_oracle(mut self, oracle: Arc<dyn MatchOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Resolve `description` against a freshly captured snapshot.
    ///
    /// Oracle failures never surface here: they degrade to
    /// [`StepError::ResolutionNotFound`].
    pub async fn resolve(
        &self,
        description: &str,
        action: ActionKind,
        snapshot: &PageSnapshot,
    ) -> Result<Resolution, StepError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(StepError::ResolutionNotFound(
                "empty target description".to_string(),
            ));
        }

        if is_structural_locator(description) {
            return Ok(Resolution::literal(description));
        }

        if let Some(hit) = cascade::run(description, action, snapshot) {
            let locator = generate_selector(hit.element, self.config.short_text_limit);
            debug!(
                "Resolved '{}' via {} ({}) -> {}",
                description, hit.strategy, hit.confidence, locator
            );
            let resolution = Resolution::new(locator, hit.strategy, hit.confidence);
            return Ok(if hit.matched > 1 {
                resolution.with_rationale(format!(
                    "{} elements matched, picked the first visible in document order",
                    hit.matched
                ))
            } else {
                resolution
            });
        }

        if let Some(resolution) = self.ask_oracle(description, action, snapshot).await {
            debug!(
                "Resolved '{}' via {} ({}) -> {}",
                description, resolution.strategy, resolution.confidence, resolution.locator
            );
            return Ok(resolution);
        }

        Err(StepError::ResolutionNotFound(format!(
            "no element matches '{}' ({} candidates on page)",
            description,
            snapshot.elements.len()
        )))
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

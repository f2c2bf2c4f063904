//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_engine(config, &mut result);
        Self::validate_resolver(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_oracle(config, &mut result);

        result
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        for (name, value) in config.engine.timeouts.entries() {
            if value == 0 {
                result.add_error(ValidationError::new(
                    format!("engine.timeouts.{}", name),
                    "timeout must be greater than 0",
                ));
            }
        }

        if config.engine.backoff_ms > 60_000 {
            result.add_warning(ValidationWarning::new(
                "engine.backoff_ms",
                "backoff is over 60s, failing steps will take a long time to report",
            ));
        }

        if config.engine.run_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "engine.run_timeout_secs",
                "run_timeout_secs must be greater than 0 when set",
            ));
        }
    }

    fn validate_resolver(config: &Config, result: &mut ValidationResult) {
        if config.resolver.max_oracle_candidates == 0 {
            result.add_error(ValidationError::new(
                "resolver.max_oracle_candidates",
                "max_oracle_candidates must be greater than 0",
            ));
        }

        if config.resolver.short_text_limit == 0 {
            result.add_error(ValidationError::new(
                "resolver.short_text_limit",
                "short_text_limit must be greater than 0",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.viewport_width == 0 || config.browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "viewport dimensions must be greater than 0",
            ));
        }
    }

    fn validate_oracle(config: &Config, result: &mut ValidationResult) {
        let oracle = &config.oracle;
        if !oracle.enabled {
            return;
        }

        if oracle.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "oracle.model",
                "model cannot be empty when the oracle is enabled",
            ));
        }

        if !oracle.api_url.starts_with("http://") && !oracle.api_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "oracle.api_url",
                "api_url must start with http:// or https://",
            ));
        }

        if oracle.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "oracle.api_key",
                "API key is not set, may need to be set via environment variable",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

//! Browser, artifact, oracle and logging configuration types.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Browser launch/attach configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Explicit Chrome binary; auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<String>,

    /// User data directory; a fresh temp dir is used when unset.
    #[serde(default)]
    pub profile_dir: Option<String>,

    /// Connect to an already-running Chrome instead of launching one.
    #[serde(default)]
    pub attach_existing: bool,

    /// How long to wait for the debugging endpoint after launch.
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,

    /// Additional command-line switches, e.g. `--no-sandbox` in containers.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: true,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            chrome_path: None,
            profile_dir: None,
            attach_existing: false,
            launch_timeout_ms: default_launch_timeout_ms(),
            extra_args: Vec::new(),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

fn default_launch_timeout_ms() -> u64 {
    6000
}

/// Failure artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifacts_dir")]
    pub dir: String,

    #[serde(default = "default_true")]
    pub screenshot_on_failure: bool,

    #[serde(default)]
    pub video_on_failure: bool,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            screenshot_on_failure: true,
            video_on_failure: false,
        }
    }
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

/// AI-matching oracle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub enabled: bool,

    /// OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_oracle_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_oracle_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    256
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for a daily-rolling log file.
    #[serde(default)]
    pub dir: Option<String>,

    /// Emit JSON lines on the console instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

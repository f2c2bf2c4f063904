//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// Run a browser test plan and print the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "stepwise")]
#[command(about = "Execute declarative browser test plans step by step")]
#[command(version)]
pub struct Cli {
    /// Test plan (JSON object with `steps`, or a bare array of steps)
    pub plan: PathBuf,

    /// Configuration file path
    #[arg(short, long, env = "STEPWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the result JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Keep executing after a blocking step fails
    #[arg(long)]
    pub continue_on_failure: bool,

    /// Abort the whole run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable the AI matching fallback regardless of configuration
    #[arg(long)]
    pub oracle: bool,
}

//! Stepwise - browser test plan runner.
//!
//! Loads configuration and a plan, runs it in a fresh Chrome session and
//! prints the test result as JSON.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stepwise_browser_cdp::ChromeSessionFactory;
use stepwise_config::{
    Config, ConfigLoader, ConfigValidator, FailurePolicy, LoggingConfig, OracleConfig,
};
use stepwise_engine::{FsArtifactCapture, TestRunner};
use stepwise_oracle_openai::OpenAiMatchOracle;
use stepwise_protocols::{ArtifactCapture, MatchOracle, RunStatus, TestPlan};

use crate::cli::Cli;

/// Initialize tracing: console output (text or JSON) on stderr, plus a
/// daily-rolling file when a log directory is configured.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let log_dir = ConfigLoader::expand_path(dir);
            std::fs::create_dir_all(&log_dir)
                .with_context(|| format!("creating log directory {}", log_dir))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("stepwise")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)
                .context("creating log file appender")?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().with_writer(non_blocking).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    // stdout carries the result document, so the console logs go to stderr.
    let (json_layer, text_layer) = if config.json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (
            None,
            Some(fmt::layer().with_target(true).with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Command-line flags win over the file.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.headed {
        config.browser.headless = false;
    }
    if cli.continue_on_failure {
        config.engine.on_failure = FailurePolicy::Continue;
    }
    if let Some(secs) = cli.timeout {
        config.engine.run_timeout_secs = Some(secs);
    }
    if cli.oracle {
        config.oracle.enabled = true;
    }
}

fn load_plan(path: &Path) -> anyhow::Result<TestPlan> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan {}", path.display()))?;
    TestPlan::from_json(&raw).with_context(|| format!("parsing plan {}", path.display()))
}

fn build_oracle(config: &OracleConfig) -> Option<Arc<dyn MatchOracle>> {
    match OpenAiMatchOracle::from_config(config) {
        Ok(oracle) => {
            info!("AI matching fallback enabled (model {})", config.model);
            Some(Arc::new(oracle))
        }
        Err(e) => {
            info!("AI matching fallback off: {}", e);
            None
        }
    }
}

/// Cancel the run on Ctrl-C or when the optional deadline passes.
fn spawn_cancel_triggers(
    cancel: CancellationToken,
    deadline: Option<Duration>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let timer = async {
            match deadline {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::signal::ctrl_c() => warn!("Interrupted, cancelling run"),
            _ = timer => warn!("Run deadline of {:?} reached, cancelling run", deadline.unwrap_or_default()),
        }
        cancel.cancel();
    })
}

fn exit_code(status: RunStatus) -> ExitCode {
    match status {
        RunStatus::Passed | RunStatus::Partial => ExitCode::SUCCESS,
        RunStatus::Failed => ExitCode::from(1),
        RunStatus::Error => ExitCode::from(2),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    apply_overrides(&mut config, &cli);

    let _guard = init_tracing(&config.logging)?;

    let validation = ConfigValidator::validate(&config);
    for e in &validation.errors {
        error!("Config error at {}: {}", e.path, e.message);
    }
    for warning in validation.into_result().context("invalid configuration")? {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }

    let plan = load_plan(&cli.plan)?;
    info!(
        "Loaded plan {} with {} step(s)",
        cli.plan.display(),
        plan.steps.len()
    );

    let factory = Arc::new(ChromeSessionFactory::new(config.browser.clone()));
    let artifacts: Arc<dyn ArtifactCapture> = Arc::new(FsArtifactCapture::new(
        ConfigLoader::expand_path(&config.artifacts.dir),
    ));
    let runner = TestRunner::from_config(
        &config,
        factory,
        build_oracle(&config.oracle),
        Some(artifacts),
    );

    let cancel = CancellationToken::new();
    let triggers = spawn_cancel_triggers(
        cancel.clone(),
        config.engine.run_timeout_secs.map(Duration::from_secs),
    );
    let result = runner.run(&plan, cancel.clone()).await;
    cancel.cancel();
    let _ = triggers.await;

    let document = serde_json::to_string_pretty(&result).context("serializing result")?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("writing result to {}", path.display()))?;
            info!("Result written to {}", path.display());
        }
        None => println!("{}", document),
    }

    Ok(exit_code(result.status))
}

//! Chrome discovery, launch and the per-run session factory.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use stepwise_config::{BrowserConfig, ConfigLoader};
use stepwise_protocols::{BrowserSession, SessionError, SessionFactory};

use crate::cdp::CdpClient;
use crate::session::CdpBrowserSession;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A Chrome process started for one session, plus its throwaway profile.
pub struct ChromeProcess {
    child: Child,
    /// Deleted on drop, after the process is gone.
    _profile: Option<TempDir>,
}

impl ChromeProcess {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Kill the process and reap it.
    pub async fn shutdown(mut self) -> Result<(), SessionError> {
        if let Ok(Some(status)) = self.child.try_wait() {
            debug!("Chrome already exited: {}", status);
            return Ok(());
        }
        self.child
            .kill()
            .await
            .map_err(|e| SessionError::TeardownFailed(format!("kill chrome: {}", e)))?;
        info!("Chrome process stopped");
        Ok(())
    }
}

/// Opens one fresh page per run, launching Chrome unless told to attach.
pub struct ChromeSessionFactory {
    config: BrowserConfig,
}

impl ChromeSessionFactory {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// HTTP debugging endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.config.debug_port)
    }

    /// Configured binary, else the first well-known install location.
    pub fn chrome_binary(&self) -> Option<PathBuf> {
        match &self.config.chrome_path {
            Some(path) => Some(PathBuf::from(ConfigLoader::expand_path(path))),
            None => find_chrome(),
        }
    }

    pub(crate) fn chrome_args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.config.debug_port),
            format!("--user-data-dir={}", profile_dir.display()),
            format!(
                "--window-size={},{}",
                self.config.viewport_width, self.config.viewport_height
            ),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
            "--mute-audio".to_string(),
        ];
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }

    /// Start Chrome with remote debugging enabled and wait for its endpoint.
    pub async fn launch(&self) -> Result<ChromeProcess, SessionError> {
        let chrome_path = self.chrome_binary().ok_or_else(|| {
            SessionError::LaunchFailed("Chrome not found; set browser.chrome_path".to_string())
        })?;

        let (profile_dir, profile) = match &self.config.profile_dir {
            Some(dir) => {
                let dir = PathBuf::from(ConfigLoader::expand_path(dir));
                if let Err(e) = std::fs::create_dir_all(&dir) {
                    warn!("Failed to create profile directory {}: {}", dir.display(), e);
                }
                (dir, None)
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("stepwise-profile-")
                    .tempdir()
                    .map_err(|e| SessionError::LaunchFailed(format!("profile dir: {}", e)))?;
                (temp.path().to_path_buf(), Some(temp))
            }
        };

        info!(
            "Launching {} (headless={}, profile={})",
            chrome_path.display(),
            self.config.headless,
            profile_dir.display()
        );

        let child = Command::new(&chrome_path)
            .args(self.chrome_args(&profile_dir))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SessionError::LaunchFailed(format!("{}: {}", chrome_path.display(), e)))?;

        let mut process = ChromeProcess {
            child,
            _profile: profile,
        };
        info!("Chrome launched with PID: {:?}", process.pid());

        if let Err(e) = self.wait_until_ready(&mut process).await {
            let _ = process.shutdown().await;
            return Err(e);
        }
        Ok(process)
    }

    async fn wait_until_ready(&self, process: &mut ChromeProcess) -> Result<(), SessionError> {
        let endpoint = self.endpoint();
        let timeout = Duration::from_millis(self.config.launch_timeout_ms);
        let start = Instant::now();

        loop {
            if CdpClient::version(&endpoint).await.is_ok() {
                debug!("Chrome endpoint ready after {:?}", start.elapsed());
                return Ok(());
            }
            if let Ok(Some(status)) = process.child.try_wait() {
                return Err(SessionError::LaunchFailed(format!(
                    "Chrome exited during startup: {}",
                    status
                )));
            }
            if start.elapsed() >= timeout {
                return Err(SessionError::LaunchFailed(format!(
                    "Chrome did not expose {} within {}ms",
                    endpoint, self.config.launch_timeout_ms
                )));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    async fn open_page(
        &self,
        process: Option<ChromeProcess>,
    ) -> Result<CdpBrowserSession, SessionError> {
        let client = CdpClient::connect(&self.endpoint()).await?;
        let page = client.new_page().await?;
        page.set_viewport(self.config.viewport_width, self.config.viewport_height)
            .await?;
        Ok(CdpBrowserSession::new(client, page, process))
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SessionError> {
        let endpoint = self.endpoint();
        let already_running = CdpClient::version(&endpoint).await.is_ok();

        let process = if self.config.attach_existing {
            if !already_running {
                return Err(SessionError::ConnectionFailed(format!(
                    "no browser listening at {}",
                    endpoint
                )));
            }
            info!("Attaching to existing Chrome at {}", endpoint);
            None
        } else if already_running {
            warn!(
                "Port {} already serves a browser; reusing it without owning the process",
                self.config.debug_port
            );
            None
        } else {
            Some(self.launch().await?)
        };

        // A launched process is killed on drop if the page cannot be opened.
        let session = self.open_page(process).await?;
        info!("Opened browser session {}", session.id());
        Ok(Box::new(session))
    }
}

/// Find a Chrome or Chromium executable in the usual install locations.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "linux")]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let paths: &[&str] = &[];

    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;

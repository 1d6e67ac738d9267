use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use super::idle::{NETWORK_IDLE_QUIET, NetworkEvent, wait_for_idle};
use super::{PdfRenderer, ensure_pdf};
use crate::error::ExportError;
use crate::print::PrintSettings;

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_LAUNCH_TIMEOUT: Duration = Duration::from_secs(20);

/// How long a graceful browser shutdown may take before the process is
/// killed.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ChromiumConfig {
    /// Browser binary. Auto-detected when unset.
    pub executable: Option<PathBuf>,
    /// Pass `--no-sandbox` (needed when running as root in containers).
    pub no_sandbox: bool,
    /// Upper bound for loading content and waiting for network idle.
    pub load_timeout: Duration,
    pub launch_timeout: Duration,
    /// Parent directory for per-launch profile directories. Defaults to the
    /// system temp dir.
    pub profile_root: Option<PathBuf>,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            executable: None,
            no_sandbox: false,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            launch_timeout: DEFAULT_LAUNCH_TIMEOUT,
            profile_root: None,
        }
    }
}

/// Prints HTML with a fresh headless Chromium per document.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    config: ChromiumConfig,
    settings: PrintSettings,
}

impl ChromiumRenderer {
    pub fn new(config: ChromiumConfig) -> Self {
        Self {
            config,
            settings: PrintSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PrintSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(&self) -> &ChromiumConfig {
        &self.config
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let session = BrowserSession::launch(&self.config).await?;
        let printed = session
            .print(html, &self.settings, self.config.load_timeout)
            .await;
        session.close().await;
        ensure_pdf(printed?)
    }
}

/// One running browser process and its profile directory.
///
/// `close` shuts the browser down gracefully. A session dropped without
/// `close` (for example when the request future is cancelled) kills the
/// process in the background and then removes the profile.
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    profile: Option<TempDir>,
}

impl BrowserSession {
    pub async fn launch(config: &ChromiumConfig) -> Result<Self, ExportError> {
        let mut profile = tempfile::Builder::new();
        profile.prefix("quire-chromium-");
        let profile = match &config.profile_root {
            Some(root) => profile.tempdir_in(root),
            None => profile.tempdir(),
        }
        .map_err(|e| ExportError::BrowserLaunch(format!("creating profile directory: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile.path())
            .launch_timeout(config.launch_timeout)
            .request_timeout(config.load_timeout)
            .arg("--font-render-hinting=none")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--hide-scrollbars")
            .arg("--mute-audio");
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        let browser_config = builder.build().map_err(ExportError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ExportError::BrowserLaunch(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser protocol error");
                }
            }
        });
        tracing::debug!(profile = %profile.path().display(), "browser launched");

        Ok(Self {
            browser: Some(browser),
            handler: Some(handler),
            profile: Some(profile),
        })
    }

    /// Load `html` into a new page and print it.
    ///
    /// Content loading and the wait for network idle share `load_timeout`.
    pub async fn print(
        &self,
        html: &str,
        settings: &PrintSettings,
        load_timeout: Duration,
    ) -> Result<Vec<u8>, ExportError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ExportError::Browser("browser session already closed".to_string()))?;
        let page = browser.new_page("about:blank").await?;

        let started = page
            .event_listener::<EventRequestWillBeSent>()
            .await?
            .map(|e| NetworkEvent::Started(e.request_id.inner().clone()));
        let finished = page
            .event_listener::<EventLoadingFinished>()
            .await?
            .map(|e| NetworkEvent::Settled(e.request_id.inner().clone()));
        let failed = page
            .event_listener::<EventLoadingFailed>()
            .await?
            .map(|e| NetworkEvent::Settled(e.request_id.inner().clone()));
        let events = futures::stream::select(started, futures::stream::select(finished, failed));

        let load = async {
            page.set_content(html).await?;
            wait_for_idle(events, NETWORK_IDLE_QUIET).await;
            Ok::<_, ExportError>(())
        };
        tokio::time::timeout(load_timeout, load)
            .await
            .map_err(|_| ExportError::RenderTimeout {
                after: load_timeout,
            })??;

        page.execute(settings.to_viewport_params()).await?;
        let pdf = page.pdf(settings.to_pdf_params()).await?;
        tracing::debug!(bytes = pdf.len(), "page printed");
        Ok(pdf)
    }

    /// Shut the browser down, killing it if it does not exit in time, and
    /// remove the profile directory.
    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            let graceful = tokio::time::timeout(CLOSE_GRACE, async {
                browser.close().await.map_err(|e| e.to_string())?;
                browser.wait().await.map_err(|e| e.to_string())?;
                Ok::<_, String>(())
            })
            .await;
            match graceful {
                Ok(Ok(())) => tracing::debug!("browser closed"),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "browser did not close cleanly, killing it");
                    kill(&mut browser).await;
                }
                Err(_) => {
                    tracing::warn!("browser did not exit in time, killing it");
                    kill(&mut browser).await;
                }
            }
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if let Some(profile) = self.profile.take() {
            let path = profile.path().to_path_buf();
            if let Err(e) = profile.close() {
                tracing::warn!(error = %e, path = %path.display(), "failed to remove browser profile");
            }
        }
    }
}

async fn kill(browser: &mut Browser) {
    if let Some(Err(e)) = browser.kill().await {
        tracing::warn!(error = %e, "failed to kill browser");
    }
    let _ = browser.wait().await;
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        let Some(mut browser) = self.browser.take() else {
            return;
        };
        let profile = self.profile.take();
        tracing::warn!("browser session dropped before close, killing browser");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    kill(&mut browser).await;
                    drop(profile);
                });
            }
            // Outside a runtime the browser's own drop kills the process.
            Err(_) => drop(browser),
        }
    }
}

//! Chrome discovery and launch
//!
//! Resolution order for the executable: explicit config path, the
//! `CHROMIUM_PATH` variable, well-known install locations, `which`, and
//! finally a managed Chromium downloaded into the user cache directory.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::config::FetchConfig;

const CHROMIUM_PATH_VAR: &str = "CHROMIUM_PATH";

/// Install locations checked on this platform, `~/` expanded lazily
fn install_candidates() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    }
}

fn expand_home(candidate: &str) -> Option<PathBuf> {
    match candidate.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(candidate)),
    }
}

fn which(binary: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(binary).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!found.is_empty()).then(|| PathBuf::from(found))
}

/// Locate an installed Chrome/Chromium
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CHROMIUM_PATH_VAR).map(PathBuf::from) {
        if path.exists() {
            info!("Using {CHROMIUM_PATH_VAR}: {}", path.display());
            return Ok(path);
        }
        warn!("{CHROMIUM_PATH_VAR} points to a missing file: {}", path.display());
    }

    if let Some(path) = install_candidates()
        .iter()
        .filter_map(|candidate| expand_home(candidate))
        .find(|path| path.exists())
    {
        info!("Found browser at {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows")
        && let Some(path) = ["chromium", "chromium-browser", "google-chrome", "chrome"]
            .into_iter()
            .find_map(which)
    {
        info!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow!("no Chrome/Chromium executable found"))
}

/// Download a managed Chromium into the user cache directory and return
/// its executable
pub async fn download_managed_browser() -> Result<PathBuf> {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let fallback = std::env::temp_dir();
        warn!("No user cache directory, downloading into {}", fallback.display());
        fallback
    });
    let install_dir = base.join("kodegen_stocknews").join("chromium");
    std::fs::create_dir_all(&install_dir)
        .with_context(|| format!("Failed to create {}", install_dir.display()))?;

    info!("Downloading managed Chromium into {}", install_dir.display());
    let options = BrowserFetcherOptions::builder()
        .with_path(&install_dir)
        .build()
        .context("Failed to build fetcher options")?;
    let installed = BrowserFetcher::new(options)
        .fetch()
        .await
        .context("Failed to download Chromium")?;

    Ok(installed.executable_path)
}

async fn resolve_executable(config: &FetchConfig) -> Result<PathBuf> {
    if let Some(path) = config.chrome_executable() {
        return Ok(path.to_path_buf());
    }
    match find_browser_executable().await {
        Ok(path) => Ok(path),
        Err(e) => {
            warn!("{e}; falling back to a managed download");
            download_managed_browser().await
        }
    }
}

/// Command-line flags applied to every launched browser
///
/// Hides the automation markers, relaxes sandboxing for containerised
/// hosts, and spoofs a desktop user agent.
#[must_use]
pub fn launch_args(user_agent: &str) -> Vec<String> {
    const FIXED: [&str; 17] = [
        "--disable-blink-features=AutomationControlled",
        "--disable-dev-shm-usage",
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-infobars",
        "--disable-notifications",
        "--no-first-run",
        "--no-default-browser-check",
        "--disable-extensions",
        "--disable-popup-blocking",
        "--disable-background-timer-throttling",
        "--disable-backgrounding-occluded-windows",
        "--disable-breakpad",
        "--disable-hang-monitor",
        "--password-store=basic",
        "--use-mock-keychain",
        "--mute-audio",
    ];

    std::iter::once(format!("--user-agent={user_agent}"))
        .chain(FIXED.iter().map(ToString::to_string))
        .collect()
}

/// Chrome emits CDP events chromiumoxide cannot deserialize; harmless
fn is_benign_handler_error(message: &str) -> bool {
    message.contains("data did not match any variant of untagged enum Message")
        || message.contains("Failed to deserialize WS response")
}

/// Launch a browser for one session
///
/// Returns the browser, its CDP handler task, and the per-session
/// profile directory, which the caller removes after the browser exits.
pub async fn launch_browser(config: &FetchConfig) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let executable = resolve_executable(config).await?;

    let profile_dir = std::env::temp_dir().join(format!(
        "kodegen_stocknews_chrome_{}",
        uuid::Uuid::new_v4().simple()
    ));
    std::fs::create_dir_all(&profile_dir)
        .with_context(|| format!("Failed to create profile dir {}", profile_dir.display()))?;

    let launched = match build_browser_config(config, &executable, &profile_dir) {
        Ok(browser_config) => Browser::launch(browser_config)
            .await
            .context("Failed to launch browser"),
        Err(e) => Err(e),
    };
    let (browser, mut handler) = match launched {
        Ok(pair) => pair,
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_dir_all(&profile_dir) {
                debug!("Could not remove {}: {cleanup}", profile_dir.display());
            }
            return Err(e);
        }
    };
    info!(
        "Launched {} (profile {})",
        executable.display(),
        profile_dir.display()
    );

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            match event {
                Err(e) if is_benign_handler_error(&e.to_string()) => {
                    trace!("Ignored CDP decode error: {e}");
                }
                Err(e) => error!("Browser handler error: {e:?}"),
                Ok(()) => {}
            }
        }
        debug!("Browser handler finished");
    });

    Ok((browser, handler_task, profile_dir))
}

fn build_browser_config(
    config: &FetchConfig,
    executable: &Path,
    profile_dir: &Path,
) -> Result<chromiumoxide::browser::BrowserConfig> {
    let mut builder = BrowserConfigBuilder::default()
        .chrome_executable(executable)
        .user_data_dir(profile_dir)
        .request_timeout(config.page_timeout())
        .window_size(1920, 1080);

    builder = if config.headless() {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder = launch_args(config.user_agent())
        .into_iter()
        .fold(builder, |builder, arg| builder.arg(arg));

    builder
        .build()
        .map_err(|e| anyhow!("Invalid browser config: {e}"))
}

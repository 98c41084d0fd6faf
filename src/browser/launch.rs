//! Headful browser launch
//!
//! The feed requires a real, logged-in session, so the browser runs with a
//! visible window and the automation-signature flags disabled. This only
//! covers the basic launch configuration; anything beyond that is out of
//! scope.

use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

/// Launch a visible browser and navigate to `url`
pub async fn launch_browser(url: &str, chrome_path: Option<&str>) -> Result<(Browser, Page)> {
    info!("🚀 Launching browser...");
    debug!("target URL: {}", url);

    let mut builder = BrowserConfig::builder().with_head().args(vec![
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
        "--disable-software-rasterizer",
        "--start-maximized",
        "--disable-blink-features=AutomationControlled",
    ]);

    if let Some(path) = chrome_path {
        debug!("using explicit chrome executable: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder.build().map_err(|e| {
        error!("browser configuration failed: {}", e);
        anyhow::anyhow!("browser configuration failed: {}", e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("browser launch failed: {}", e);
        anyhow::anyhow!("browser launch failed: {}", e)
    })?;
    debug!("browser launched");

    // Drain CDP events in the background
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Give the browser a moment to settle before the first command
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("opening {} failed: {}", url, e);
        anyhow::anyhow!("opening {} failed: {}", url, e)
    })?;

    info!("✓ Browser open at: {}", url);

    Ok((browser, page))
}

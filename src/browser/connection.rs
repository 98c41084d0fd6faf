//! Attach to an already-running browser
//!
//! Useful when the operator keeps a long-lived, logged-in profile open with
//! `--remote-debugging-port`: the bot reuses that session instead of
//! launching a fresh one and forcing a new login.

use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

/// Connect over the debug port and pick up (or open) a page on `target_url`
pub async fn connect_to_browser(port: u16, target_url: &str) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("Connecting to browser: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("browser connection failed: {}", e);
        anyhow::anyhow!("browser connection failed ({}): {}", browser_url, e)
    })?;
    debug!("browser connected");

    // Drain CDP events in the background
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Let the browser state sync before enumerating pages
    sleep(Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("found {} open pages", pages.len());

    // Reuse an existing tab already on the target site
    for p in pages.iter() {
        if let Ok(Some(url)) = p.url().await {
            if url.starts_with(target_url) {
                info!("✓ Reusing open page: {}", url);
                return Ok((browser, p.clone()));
            }
        }
    }

    debug!("no matching page, opening a new one");
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("page creation failed: {}", e);
        anyhow::anyhow!("page creation failed: {}", e)
    })?;
    page.goto(target_url).await.map_err(|e| {
        error!("navigation to {} failed: {}", target_url, e);
        anyhow::anyhow!("navigation to {} failed: {}", target_url, e)
    })?;
    info!("Navigated to: {}", target_url);

    Ok((browser, page))
}

//! Application bootstrap and lifecycle
//!
//! Owns the browser session for the whole process: open the site, gate on
//! manual login, hand the page to the bot loop, and release the session on
//! shutdown or operator interrupt.

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::infrastructure::Dom;
use crate::orchestrator::BotLoop;

pub struct App {
    config: Config,
    browser: Browser,
    dom: Dom,
}

impl App {
    /// Bring up the browser session; fails fast on missing credentials
    pub async fn initialize(config: Config) -> Result<Self> {
        if config.openai_api_key.is_empty() {
            anyhow::bail!("OPENAI_API_KEY is not set");
        }

        let (browser, page) = match config.browser_debug_port {
            Some(port) => browser::connect_to_browser(port, &config.feed_url).await?,
            None => browser::launch_browser(&config.feed_url, config.chrome_path.as_deref()).await?,
        };

        Ok(Self {
            config,
            browser,
            dom: Dom::new(page),
        })
    }

    pub async fn run(mut self) -> Result<()> {
        log_banner("Timeline Reply Bot Starting...");

        // let the landing page settle before polling for login
        sleep(Duration::from_secs(3)).await;

        browser::wait_manual_login(&self.dom).await.map_err(|e| {
            error!("login timeout - please log in within 5 minutes");
            anyhow::anyhow!(e)
        })?;

        info!("Please switch to the Following feed manually now...");
        sleep(Duration::from_secs(10)).await;
        if let Ok(Some(url)) = self.dom.current_url().await {
            info!("Feed locked at: {}", url);
        }

        log_banner("Login successful! Starting bot...");

        let bot = BotLoop::new(&self.config);
        let result = tokio::select! {
            r = bot.run(&self.dom) => r,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                Ok(())
            }
        };

        // release the automation session whatever happened above
        if let Err(e) = self.browser.close().await {
            warn!("browser did not close cleanly: {}", e);
        }
        info!("Bot finished.");

        result
    }
}

fn log_banner(message: &str) {
    info!("{}", "=".repeat(60));
    info!("{}", message);
    info!("{}", "=".repeat(60));
}

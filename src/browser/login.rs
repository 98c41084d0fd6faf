//! Manual-login gate
//!
//! The bot never automates credentials. It opens the site and polls for the
//! logged-in profile anchor until the operator has signed in by hand.

use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::infrastructure::Dom;

/// Marker that only exists once the session is authenticated
const PROFILE_ANCHOR: &str = "a[aria-label='Profile']";

const LOGIN_ATTEMPTS: u64 = 60;
const LOGIN_POLL_SECS: u64 = 5;

/// Block until manual login is detected, or time out after five minutes
pub async fn wait_manual_login(dom: &Dom) -> Result<(), SessionError> {
    info!("Waiting for manual login...");

    for attempt in 0..LOGIN_ATTEMPTS {
        if dom.exists(PROFILE_ANCHOR).await {
            info!("✓ Login detected");
            return Ok(());
        }
        debug!("login not detected yet (attempt {})", attempt + 1);
        sleep(Duration::from_secs(LOGIN_POLL_SECS)).await;
    }

    Err(SessionError::LoginTimeout(LOGIN_ATTEMPTS * LOGIN_POLL_SECS))
}

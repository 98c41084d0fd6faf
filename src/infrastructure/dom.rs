//! DOM driver - infrastructure layer
//!
//! Owns the one Page resource and exposes the capabilities the rest of the
//! bot needs: JS evaluation, element lookup, navigation and scroll control.
//! Nothing in here knows about posts, replies or the feed.

use std::time::{Duration, Instant};

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::{Element, Page};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::debug;

/// How often `wait_for` re-polls for an element
const POLL_STEP: Duration = Duration::from_millis(500);

/// Chromium input-domain modifier bit for Ctrl
const CTRL_MODIFIER: i64 = 2;

/// Key-down/key-up pair for a Ctrl+Enter chord on the input domain
fn ctrl_enter_events() -> Result<(DispatchKeyEventParams, DispatchKeyEventParams)> {
    let event = |event_type: DispatchKeyEventType| {
        DispatchKeyEventParams::builder()
            .r#type(event_type)
            .modifiers(CTRL_MODIFIER)
            .key("Enter")
            .code("Enter")
            .windows_virtual_key_code(13)
            .build()
            .map_err(|e| anyhow::anyhow!("key event build failed: {}", e))
    };
    Ok((
        event(DispatchKeyEventType::RawKeyDown)?,
        event(DispatchKeyEventType::KeyUp)?,
    ))
}

pub struct Dom {
    page: Page,
}

impl Dom {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Access to the underlying page (browser-level operations only)
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Run JS and return its value as JSON
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// Run JS and deserialize the value into `T`
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// Run JS for its side effect, ignoring the result value
    pub async fn exec(&self, js_code: impl Into<String>) -> Result<()> {
        self.page.evaluate(js_code.into()).await?;
        Ok(())
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    pub async fn reload(&self) -> Result<()> {
        self.page.reload().await?;
        Ok(())
    }

    pub async fn current_url(&self) -> Result<Option<String>> {
        Ok(self.page.url().await?)
    }

    pub async fn find(&self, selector: &str) -> Result<Element> {
        Ok(self.page.find_element(selector).await?)
    }

    /// All elements matching `selector`; lookup failures become an empty list
    pub async fn find_all(&self, selector: &str) -> Vec<Element> {
        match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!("find_all('{}') failed: {}", selector, e);
                Vec::new()
            }
        }
    }

    /// Whether at least one element matches `selector` right now
    pub async fn exists(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }

    /// Poll for an element until it appears or `timeout` elapses
    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Option<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Some(element);
            }
            if Instant::now() >= deadline {
                debug!("wait_for('{}') timed out after {:?}", selector, timeout);
                return None;
            }
            sleep(POLL_STEP).await;
        }
    }

    pub async fn scroll_to_bottom(&self) -> Result<()> {
        self.exec("window.scrollTo(0, document.body.scrollHeight);")
            .await
    }

    pub async fn scroll_to_top(&self) -> Result<()> {
        self.exec("window.scrollTo(0, 0);").await
    }

    /// Send Escape to whatever currently has focus; used to close stray
    /// compose surfaces after a failed attempt
    pub async fn press_escape(&self) -> Result<()> {
        let body = self.page.find_element("body").await?;
        body.press_key("Escape").await?;
        Ok(())
    }

    /// Send Ctrl+Enter to the focused element through the CDP input domain.
    ///
    /// Synthetic JS `KeyboardEvent`s carry `isTrusted=false` and page-level
    /// shortcut handlers ignore them; this goes through the browser's real
    /// input pipeline instead.
    pub async fn press_ctrl_enter(&self) -> Result<()> {
        let (down, up) = ctrl_enter_events()?;
        self.page.execute(down).await?;
        self.page.execute(up).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_enter_is_a_modified_down_up_pair() {
        let (down, up) = ctrl_enter_events().unwrap();
        assert!(matches!(down.r#type, DispatchKeyEventType::RawKeyDown));
        assert!(matches!(up.r#type, DispatchKeyEventType::KeyUp));
        assert_eq!(down.modifiers, Some(CTRL_MODIFIER));
        assert_eq!(up.modifiers, Some(CTRL_MODIFIER));
        assert_eq!(down.key.as_deref(), Some("Enter"));
        assert_eq!(down.windows_virtual_key_code, Some(13));
    }
}

//! Reply composition and submission - business capability layer
//!
//! Drives the compose modal for a single post through a fixed sequence of
//! stages: open, generate, type, send. Every stage failure ends the attempt
//! in a tagged `ReplyAttempt` variant and escapes any open compose surface,
//! so the UI is back in a neutral state for the next candidate. Driver
//! errors never leak out of `submit`.

use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::infrastructure::Dom;
use crate::models::{PostHandle, ReplyAttempt, SendMethod};
use crate::services::ReplyGenerator;

/// Reply affordance on a post
const REPLY_BUTTON_SELECTOR: &str = "button[data-testid='reply']";
/// The compose surface
const DIALOG_SELECTOR: &str = "div[role='dialog']";
/// The editable reply box
const TEXTBOX_SELECTOR: &str = "div[role='textbox']";

/// How long to wait for the compose surface / textbox to appear
const COMPOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// One way of locating and triggering a submit control.
///
/// The platform's control attributes are not a contract we own, so sending
/// walks an ordered chain from the most specific selector to the broadest.
/// Disabled controls are skipped; the first control successfully clicked
/// wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStrategy {
    /// Direct CSS selector for a known submit control
    Selector(&'static str),
    /// Dialog-scoped button whose span label matches exactly
    DialogLabel(&'static str),
}

/// Priority order: most specific first, broadest last
pub const SEND_STRATEGIES: &[SendStrategy] = &[
    SendStrategy::Selector("button[data-testid='tweetButtonInline']"),
    SendStrategy::Selector("button[data-testid='tweetButton']"),
    SendStrategy::DialogLabel("Reply"),
    SendStrategy::Selector("button[data-testid*='tweet']"),
];

impl SendStrategy {
    pub fn describe(&self) -> String {
        match self {
            SendStrategy::Selector(css) => format!("selector {}", css),
            SendStrategy::DialogLabel(label) => format!("dialog button labelled '{}'", label),
        }
    }

    /// Locate the control and JS-click it. `Ok(false)` means not found or
    /// disabled; only a driver failure is an `Err`.
    pub async fn locate_and_click(&self, dom: &Dom) -> anyhow::Result<bool> {
        let js = match self {
            SendStrategy::Selector(css) => format!(
                r#"(() => {{
                    const btn = document.querySelector("{css}");
                    if (!btn || btn.disabled) return false;
                    btn.click();
                    return true;
                }})()"#
            ),
            SendStrategy::DialogLabel(label) => format!(
                r#"(() => {{
                    const dialog = document.querySelector("div[role='dialog']");
                    if (!dialog) return false;
                    for (const btn of dialog.querySelectorAll("button")) {{
                        const span = btn.querySelector("span");
                        if (span && span.textContent.trim() === "{label}" && !btn.disabled) {{
                            btn.click();
                            return true;
                        }}
                    }}
                    return false;
                }})()"#
            ),
        };
        dom.eval_as::<bool>(js).await
    }
}

pub struct ComposeSubmitter {
    generator: ReplyGenerator,
}

impl ComposeSubmitter {
    pub fn new(config: &Config) -> Self {
        Self {
            generator: ReplyGenerator::new(config),
        }
    }

    /// Run one full submission attempt against the given post.
    ///
    /// Terminal stages only; the caller decides what a failure means for the
    /// wider pass.
    pub async fn submit(&self, dom: &Dom, post: &PostHandle) -> ReplyAttempt {
        // --- OpeningCompose ---
        if !self.open_compose(dom, post).await {
            return ReplyAttempt::ComposeFailed;
        }

        // --- Generating ---
        let reply = match self.generator.generate(&post.body_text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("generation failed for {}: {}", post.id_prefix(), e);
                self.escape(dom).await;
                return ReplyAttempt::GenerationFailed;
            }
        };
        info!("Generated: {}", reply);

        // --- Typing ---
        if let Err(e) = self.type_reply(dom, &reply).await {
            error!("typing failed for {}: {}", post.id_prefix(), e);
            self.escape(dom).await;
            return ReplyAttempt::SendFailed;
        }

        // --- Sending ---
        match self.try_send(dom).await {
            Some(method) => {
                // give the platform a moment before verification looks around
                sleep(Duration::from_secs(4)).await;
                ReplyAttempt::Sent { reply, method }
            }
            None => {
                error!("✗ no send affordance worked for {}", post.id_prefix());
                self.escape(dom).await;
                ReplyAttempt::SendFailed
            }
        }
    }

    /// Click the reply affordance and wait for the compose surface
    async fn open_compose(&self, dom: &Dom, post: &PostHandle) -> bool {
        if let Err(e) = post.element.scroll_into_view().await {
            warn!("could not scroll post {} into view: {}", post.id_prefix(), e);
            return false;
        }
        sleep(Duration::from_secs(1)).await;

        let reply_btn = match post.element.find_element(REPLY_BUTTON_SELECTOR).await {
            Ok(btn) => btn,
            Err(e) => {
                warn!("no reply button on {}: {}", post.id_prefix(), e);
                return false;
            }
        };
        if let Err(e) = reply_btn.click().await {
            warn!("reply button click failed on {}: {}", post.id_prefix(), e);
            return false;
        }
        sleep(Duration::from_secs(3)).await;

        match dom.wait_for(DIALOG_SELECTOR, COMPOSE_TIMEOUT).await {
            Some(_) => {
                info!("Compose modal opened");
                true
            }
            None => {
                warn!("compose modal did not open for {}", post.id_prefix());
                false
            }
        }
    }

    /// Clear any pre-filled content and type the reply like a human would
    async fn type_reply(&self, dom: &Dom, reply: &str) -> anyhow::Result<()> {
        let textbox = dom
            .wait_for(TEXTBOX_SELECTOR, COMPOSE_TIMEOUT)
            .await
            .ok_or_else(|| anyhow::anyhow!("compose textbox never appeared"))?;

        textbox.click().await?;
        sleep(Duration::from_millis(500)).await;

        // clear whatever the platform pre-filled
        textbox.focus().await?;
        dom.exec(
            "document.execCommand('selectAll', false, null); \
             document.execCommand('delete', false, null);",
        )
        .await?;
        sleep(Duration::from_millis(300)).await;

        // character-by-character with jitter, as pacing
        let mut buf = [0u8; 4];
        for ch in reply.chars() {
            textbox.type_str(&*ch.encode_utf8(&mut buf)).await?;
            sleep(Duration::from_millis(typing_jitter_ms())).await;
        }

        // trailing space + backspace so the reactive editor registers the
        // content as edited and enables the send button
        textbox.type_str(" ").await?;
        sleep(Duration::from_millis(200)).await;
        textbox.press_key("Backspace").await?;
        sleep(Duration::from_secs(1)).await;

        info!("Reply typed");
        Ok(())
    }

    /// Walk the strategy chain, then fall back to the keyboard shortcut
    async fn try_send(&self, dom: &Dom) -> Option<SendMethod> {
        for strategy in SEND_STRATEGIES {
            debug!("trying send via {}", strategy.describe());
            match strategy.locate_and_click(dom).await {
                Ok(true) => {
                    info!("✓ Send triggered via {}", strategy.describe());
                    return Some(SendMethod::ButtonClick);
                }
                Ok(false) => continue,
                Err(e) => {
                    debug!("send via {} failed: {}", strategy.describe(), e);
                    continue;
                }
            }
        }

        debug!("all send strategies exhausted, trying Ctrl+Enter");
        match self.keyboard_submit(dom).await {
            Ok(true) => {
                info!("✓ Send triggered via keyboard shortcut");
                Some(SendMethod::KeyboardShortcut)
            }
            Ok(false) => None,
            Err(e) => {
                debug!("keyboard shortcut failed: {}", e);
                None
            }
        }
    }

    /// Focus the textbox and send a real Ctrl+Enter chord. `Ok(false)` means
    /// the textbox is gone; a focus or dispatch failure is an `Err`. Success
    /// is only reported once the chord was actually delivered.
    async fn keyboard_submit(&self, dom: &Dom) -> anyhow::Result<bool> {
        let textbox = match dom.find(TEXTBOX_SELECTOR).await {
            Ok(el) => el,
            Err(_) => return Ok(false),
        };
        textbox.focus().await?;
        dom.press_ctrl_enter().await?;
        Ok(true)
    }

    /// Close any open compose surface; best effort
    async fn escape(&self, dom: &Dom) {
        if let Err(e) = dom.press_escape().await {
            debug!("escape failed: {}", e);
        }
    }
}

/// Per-character typing delay, 20-60 ms
fn typing_jitter_ms() -> u64 {
    use rand::Rng;
    rand::rng().random_range(20..=60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_chain_is_most_specific_first() {
        assert_eq!(
            SEND_STRATEGIES[0],
            SendStrategy::Selector("button[data-testid='tweetButtonInline']")
        );
        // the broadest, attribute-contains selector comes last
        assert_eq!(
            SEND_STRATEGIES[SEND_STRATEGIES.len() - 1],
            SendStrategy::Selector("button[data-testid*='tweet']")
        );
    }

    #[test]
    fn strategy_chain_includes_dialog_label() {
        assert!(SEND_STRATEGIES
            .iter()
            .any(|s| *s == SendStrategy::DialogLabel("Reply")));
    }

    #[test]
    fn describe_names_the_target() {
        assert_eq!(
            SendStrategy::Selector("button[data-testid='tweetButton']").describe(),
            "selector button[data-testid='tweetButton']"
        );
        assert_eq!(
            SendStrategy::DialogLabel("Reply").describe(),
            "dialog button labelled 'Reply'"
        );
    }

    #[test]
    fn typing_jitter_stays_in_band() {
        for _ in 0..100 {
            let delay = typing_jitter_ms();
            assert!((20..=60).contains(&delay));
        }
    }
}

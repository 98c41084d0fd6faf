//! Submission verification - business capability layer
//!
//! Best-effort, non-authoritative check that a submitted reply actually
//! landed. Two signals, in order:
//!
//! 1. the compose surface has closed (weak, false-positive tolerant);
//! 2. the reply is visible under the post's permalink, authored by us.
//!
//! The first signal is a deliberate precision/recall trade-off inherited
//! from the workflow this automates: forward progress is preferred over
//! strict confirmation. It is gated behind `treat_closed_modal_as_success`
//! so the tolerance is a tunable parameter, not buried logic.

use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::infrastructure::Dom;

/// Permalink prefix; the status id is appended
const PERMALINK_BASE: &str = "https://x.com/i/status";

const DIALOG_SELECTOR: &str = "div[role='dialog']";
const POST_SELECTOR: &str = "article[data-testid='tweet']";
const AUTHOR_BLOCK_SELECTOR: &str = "div[data-testid='User-Name']";
const BODY_SELECTOR: &str = "div[data-testid='tweetText']";

/// How a verification attempt concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The reply was found on the permalink page, authored by us
    Confirmed,
    /// Only the modal-closed heuristic fired; accepted as likely success
    SoftSuccess,
    /// No positive evidence at all
    Unverified,
}

pub struct SubmissionVerifier {
    /// Accept a closed compose modal as evidence of success
    treat_closed_modal_as_success: bool,
    /// How many rendered replies to inspect on the permalink page
    reply_scan_limit: usize,
}

impl Default for SubmissionVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionVerifier {
    pub fn new() -> Self {
        Self {
            treat_closed_modal_as_success: true,
            reply_scan_limit: 10,
        }
    }

    /// Judge whether the reply for `post_id` is now visible.
    ///
    /// Never errors: navigation or lookup failures degrade to `Unverified`.
    /// Whatever happens, the page is navigated back to where it was.
    pub async fn verify(
        &self,
        dom: &Dom,
        post_id: &str,
        reply_text: &str,
        own_handle: &str,
    ) -> Verification {
        info!("Verifying reply was posted...");

        // settle: give the UI time to react to the send
        sleep(Duration::from_secs(3)).await;

        if self.treat_closed_modal_as_success && self.compose_closed(dom).await {
            info!("✓ Compose modal closed - likely successful");
            return Verification::SoftSuccess;
        }

        let found = self.find_on_permalink(dom, post_id, reply_text, own_handle).await;
        match &found {
            Ok(true) => {}
            Ok(false) => warn!("reply not found on the post page"),
            Err(e) => warn!("verification error: {}", e),
        }

        // the navigation itself tears down any modal, so one last look at
        // the dialog is still informative, even when the scan errored out
        let modal_closed = self.compose_closed(dom).await;
        let verdict = post_scan_verdict(found, modal_closed, self.treat_closed_modal_as_success);
        match verdict {
            Verification::Confirmed => info!("✓ Reply verified on the post page"),
            Verification::SoftSuccess => info!("Modal closed, assuming success"),
            Verification::Unverified => warn!("no evidence the reply posted"),
        }
        verdict
    }

    async fn compose_closed(&self, dom: &Dom) -> bool {
        !dom.exists(DIALOG_SELECTOR).await
    }

    /// Open the permalink, scan the first replies for one of ours, then
    /// restore the previous URL regardless of what was found
    async fn find_on_permalink(
        &self,
        dom: &Dom,
        post_id: &str,
        reply_text: &str,
        own_handle: &str,
    ) -> anyhow::Result<bool> {
        let original_url = dom.current_url().await.ok().flatten();

        let url = format!("{}/{}", PERMALINK_BASE, post_id);
        debug!("checking {} for our reply", url);
        let found = match dom.goto(&url).await {
            Ok(()) => {
                sleep(Duration::from_secs(4)).await;
                self.scan_replies(dom, reply_text, own_handle).await
            }
            Err(e) => Err(anyhow::anyhow!("navigation to permalink failed: {}", e)),
        };

        // always restore prior navigation state
        if let Some(back) = original_url {
            if let Err(e) = dom.goto(&back).await {
                warn!("could not navigate back to {}: {}", back, e);
            }
            sleep(Duration::from_secs(2)).await;
        }

        found
    }

    async fn scan_replies(
        &self,
        dom: &Dom,
        reply_text: &str,
        own_handle: &str,
    ) -> anyhow::Result<bool> {
        let entries = dom.find_all(POST_SELECTOR).await;
        let own_lower = own_handle.to_lowercase();

        for entry in entries.into_iter().take(self.reply_scan_limit) {
            let author = match entry.find_element(AUTHOR_BLOCK_SELECTOR).await {
                Ok(el) => el.inner_text().await.ok().flatten().unwrap_or_default(),
                Err(_) => continue,
            };
            if !author.to_lowercase().contains(&own_lower) {
                continue;
            }

            let text = match entry.find_element(BODY_SELECTOR).await {
                Ok(el) => el.inner_text().await.ok().flatten().unwrap_or_default(),
                Err(_) => continue,
            };
            if texts_match(reply_text, &text) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Fold the permalink scan outcome and the final modal state into a
/// verdict. A scan error counts the same as a miss: the modal heuristic
/// still gets its say.
fn post_scan_verdict(
    found: anyhow::Result<bool>,
    modal_closed: bool,
    treat_closed_modal_as_success: bool,
) -> Verification {
    match found {
        Ok(true) => Verification::Confirmed,
        _ if treat_closed_modal_as_success && modal_closed => Verification::SoftSuccess,
        _ => Verification::Unverified,
    }
}

/// Substring match in either direction, trimmed: rendered text may be
/// truncated or carry extra decoration around what we typed
fn texts_match(reply: &str, rendered: &str) -> bool {
    let reply = reply.trim();
    let rendered = rendered.trim();
    if reply.is_empty() || rendered.is_empty() {
        return false;
    }
    rendered.contains(reply) || reply.contains(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_text_matches() {
        assert!(texts_match("nice one", "nice one"));
    }

    #[test]
    fn rendered_superset_matches() {
        assert!(texts_match("nice one", "nice one\nTranslate post"));
    }

    #[test]
    fn truncated_render_matches() {
        assert!(texts_match("a long reply that got cut off somewhere", "a long reply that got"));
    }

    #[test]
    fn unrelated_text_does_not_match() {
        assert!(!texts_match("nice one", "completely different"));
    }

    #[test]
    fn empty_sides_never_match() {
        assert!(!texts_match("", "anything"));
        assert!(!texts_match("anything", "   "));
    }

    #[test]
    fn scan_hit_confirms_regardless_of_modal() {
        assert_eq!(post_scan_verdict(Ok(true), false, true), Verification::Confirmed);
    }

    #[test]
    fn scan_miss_with_closed_modal_is_soft_success() {
        assert_eq!(post_scan_verdict(Ok(false), true, true), Verification::SoftSuccess);
        assert_eq!(post_scan_verdict(Ok(false), false, true), Verification::Unverified);
    }

    #[test]
    fn scan_error_still_consults_the_modal() {
        assert_eq!(
            post_scan_verdict(Err(anyhow::anyhow!("navigation failed")), true, true),
            Verification::SoftSuccess
        );
        assert_eq!(
            post_scan_verdict(Err(anyhow::anyhow!("navigation failed")), false, true),
            Verification::Unverified
        );
    }

    #[test]
    fn disabled_modal_heuristic_never_soft_succeeds() {
        assert_eq!(post_scan_verdict(Ok(false), true, false), Verification::Unverified);
        assert_eq!(
            post_scan_verdict(Err(anyhow::anyhow!("navigation failed")), true, false),
            Verification::Unverified
        );
    }
}

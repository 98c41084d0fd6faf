//! Single-post reply flow - workflow layer
//!
//! Defines the complete handling of one post: submit the reply (which
//! internally generates it), then verify, then report a single outcome to
//! the orchestrator. Holds no resources of its own; only business
//! capabilities.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::Dom;
use crate::models::{PostHandle, ReplyAttempt};
use crate::services::{ComposeSubmitter, SubmissionVerifier, Verification};
use crate::utils::logging::truncate_text;
use crate::workflow::post_ctx::PostCtx;

/// What one flow run means for the wider pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply went out and was at least soft-verified; persist it
    Replied { reply: String },
    /// Nothing was persisted; the post stays eligible for a later pass.
    /// `feed_stale` is set when the attempt navigated away from the feed,
    /// which detaches every handle from the current scan.
    Skipped { feed_stale: bool },
}

pub struct ReplyFlow {
    submitter: ComposeSubmitter,
    verifier: SubmissionVerifier,
    own_handle: String,
}

impl ReplyFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            submitter: ComposeSubmitter::new(config),
            verifier: SubmissionVerifier::new(),
            own_handle: config.bot_handle.clone(),
        }
    }

    pub async fn run(&self, dom: &Dom, post: &PostHandle, ctx: &PostCtx) -> ReplyOutcome {
        info!("{} Processing: {}", ctx, truncate_text(&post.body_text, 60));

        let attempt = self.submitter.submit(dom, post).await;
        match attempt {
            ReplyAttempt::Sent { reply, method } => {
                debug!("{} sent via {:?}", ctx, method);
                let verification = self
                    .verifier
                    .verify(dom, &post.post_id, &reply, &self.own_handle)
                    .await;
                match verification {
                    Verification::Confirmed => info!("{} ✓ Reply posted and verified", ctx),
                    Verification::SoftSuccess => info!("{} ✓ Reply accepted on soft evidence", ctx),
                    Verification::Unverified => warn!("{} ⚠ sent but unverified, not recording", ctx),
                }
                verified_outcome(reply, verification)
            }
            ReplyAttempt::ComposeFailed => {
                warn!("{} ⚠ compose surface never opened", ctx);
                ReplyOutcome::Skipped { feed_stale: false }
            }
            ReplyAttempt::GenerationFailed => {
                warn!("{} ⚠ generation failed, post stays eligible", ctx);
                ReplyOutcome::Skipped { feed_stale: false }
            }
            ReplyAttempt::SendFailed => {
                warn!("{} ⚠ could not type or send the reply", ctx);
                ReplyOutcome::Skipped { feed_stale: false }
            }
        }
    }
}

/// Verification of a sent reply may visit the permalink and navigate back,
/// which detaches every element handle from the current feed scan. An
/// unverified send therefore marks the feed stale so the pass rescans
/// instead of touching the remaining handles.
fn verified_outcome(reply: String, verification: Verification) -> ReplyOutcome {
    match verification {
        Verification::Confirmed | Verification::SoftSuccess => ReplyOutcome::Replied { reply },
        Verification::Unverified => ReplyOutcome::Skipped { feed_stale: true },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unverified_send_marks_the_feed_stale() {
        assert_eq!(
            verified_outcome("gm".to_string(), Verification::Unverified),
            ReplyOutcome::Skipped { feed_stale: true }
        );
    }

    #[test]
    fn any_positive_verification_is_replied() {
        for verification in [Verification::Confirmed, Verification::SoftSuccess] {
            assert_eq!(
                verified_outcome("gm".to_string(), verification),
                ReplyOutcome::Replied { reply: "gm".to_string() }
            );
        }
    }
}

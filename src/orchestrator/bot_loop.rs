//! Main bot loop - orchestration layer
//!
//! Drives one reply per feed pass: refresh and re-render the feed, scan the
//! rendered posts, skip anything already handled or ineligible, run the
//! reply flow on the first candidate, persist the outcome, then sit in
//! `wait_for_new_post` until the feed moves again. Loop-scoped counters
//! live in an explicit `BotState` value, not in globals.

use anyhow::Result;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::infrastructure::Dom;
use crate::services::history_store::History;
use crate::services::{FeedScanner, HistoryRecord, HistoryStore};
use crate::workflow::{PostCtx, ReplyFlow, ReplyOutcome};

/// Process-scoped counters; reset only on restart
#[derive(Debug, Default, Clone, Copy)]
pub struct BotState {
    pub daily_reply_count: usize,
    pub consecutive_empty_scans: usize,
}

impl BotState {
    /// Record a scan that returned nothing; true once the consecutive-empty
    /// threshold is reached
    pub fn record_empty_scan(&mut self, max_empty_scans: usize) -> bool {
        self.consecutive_empty_scans += 1;
        self.consecutive_empty_scans >= max_empty_scans
    }

    /// A scan with posts resets the empty streak
    pub fn record_posts_seen(&mut self) {
        self.consecutive_empty_scans = 0;
    }
}

/// Why a scanned post was not a reply candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already in the history store
    AlreadyReplied,
    /// Authored by the bot itself
    OwnPost,
    /// Body text below the eligibility threshold
    TooShort,
}

/// Pure candidate filter; the history store is the single source of truth
/// for "already handled", plus the self-authorship and length checks
pub fn skip_reason(
    post_id: &str,
    author_handle: &str,
    body_text: &str,
    history: &History,
    own_handle: &str,
    min_text_len: usize,
) -> Option<SkipReason> {
    if history.contains_key(post_id) {
        return Some(SkipReason::AlreadyReplied);
    }
    if !author_handle.is_empty() && author_handle.eq_ignore_ascii_case(own_handle) {
        return Some(SkipReason::OwnPost);
    }
    if body_text.chars().count() < min_text_len {
        return Some(SkipReason::TooShort);
    }
    None
}

pub struct BotLoop {
    config: Config,
    scanner: FeedScanner,
    flow: ReplyFlow,
    store: HistoryStore,
}

impl BotLoop {
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: FeedScanner::new(config),
            flow: ReplyFlow::new(config),
            store: HistoryStore::new(config.history_file.clone()),
            config: config.clone(),
        }
    }

    /// Run until the daily cap is hit, the feed goes dead, or the session
    /// is lost. A clean return is a normal shutdown, not an error.
    pub async fn run(&self, dom: &Dom) -> Result<()> {
        let mut history = self.store.load();
        let mut state = BotState::default();

        info!("Starting bot loop ({} posts already in history)...", history.len());

        loop {
            info!("Refreshing feed...");
            self.scanner.force_render(dom).await;

            let posts = self.scanner.scan(dom).await;
            info!("Found {} posts on page", posts.len());

            if posts.is_empty() {
                let feed_dead = state.record_empty_scan(self.config.max_empty_scans);
                warn!(
                    "No posts found ({}/{}) - check that the page loaded",
                    state.consecutive_empty_scans, self.config.max_empty_scans
                );
                if feed_dead {
                    error!("Too many consecutive empty scans. Stopping.");
                    return Ok(());
                }
                sleep(Duration::from_secs(10)).await;
                continue;
            }
            state.record_posts_seen();

            let total = posts.len();
            for (idx, post) in posts.iter().enumerate() {
                if let Some(cap) = self.config.max_daily_replies {
                    if state.daily_reply_count >= cap {
                        info!("✓ Daily limit reached: {}/{}", state.daily_reply_count, cap);
                        return Ok(());
                    }
                }

                if let Some(reason) = skip_reason(
                    &post.post_id,
                    &post.author_handle,
                    &post.body_text,
                    &history,
                    &self.config.bot_handle,
                    self.config.min_post_text_len,
                ) {
                    debug!("post {}: skipped ({:?})", post.id_prefix(), reason);
                    continue;
                }

                // catches own reposts/threads the author field misses
                if self.scanner.is_own_post(post, &self.config.bot_handle).await {
                    debug!("post {}: skipped (own link present)", post.id_prefix());
                    continue;
                }

                let ctx = PostCtx::new(post.post_id.clone(), idx + 1, total);
                info!("{}", "=".repeat(60));
                info!("{} candidate selected", ctx);
                info!("{}", "=".repeat(60));

                match self.flow.run(dom, post, &ctx).await {
                    ReplyOutcome::Replied { reply } => {
                        // persist strictly before considering the next post
                        history.insert(
                            post.post_id.clone(),
                            HistoryRecord::new(&reply, &post.body_text),
                        );
                        self.store.save(&history)?;
                        state.daily_reply_count += 1;
                        info!(
                            "✓✓✓ Replied successfully ({} so far this run) ✓✓✓",
                            state.daily_reply_count
                        );

                        // throttle: one reply per observed new post
                        let fresh = self
                            .scanner
                            .wait_for_new_post(dom, &history, self.config.new_post_poll_secs)
                            .await?;
                        info!("resuming pass after new post {}", fresh.id_prefix());
                        break;
                    }
                    ReplyOutcome::Skipped { feed_stale } => {
                        warn!("✗ Failed to reply to {}", post.id_prefix());
                        if feed_stale {
                            // the attempt navigated away; the remaining
                            // handles are detached, so rescan the feed
                            info!("page navigated during the attempt, rescanning feed");
                            break;
                        }
                        sleep(Duration::from_secs(3)).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::HistoryRecord;

    fn history_with(ids: &[&str]) -> History {
        let mut history = History::new();
        for id in ids {
            history.insert(id.to_string(), HistoryRecord::new("r", "o"));
        }
        history
    }

    #[test]
    fn eligible_post_is_not_skipped() {
        let history = History::new();
        assert_eq!(
            skip_reason("123", "someone", "Great news about the market", &history, "SubyxHub", 10),
            None
        );
    }

    #[test]
    fn replied_post_is_skipped_even_while_rendered() {
        let history = history_with(&["123"]);
        assert_eq!(
            skip_reason("123", "someone", "Great news about the market", &history, "SubyxHub", 10),
            Some(SkipReason::AlreadyReplied)
        );
    }

    #[test]
    fn restart_never_reattempts_persisted_ids() {
        let ids = ["1", "2", "3", "4", "5"];
        let history = history_with(&ids);
        for id in ids {
            assert_eq!(
                skip_reason(id, "someone", "long enough body text", &history, "SubyxHub", 10),
                Some(SkipReason::AlreadyReplied)
            );
        }
    }

    #[test]
    fn own_posts_are_never_selected() {
        let history = History::new();
        assert_eq!(
            skip_reason("9", "SubyxHub", "long enough body text", &history, "SubyxHub", 10),
            Some(SkipReason::OwnPost)
        );
        // handle comparison is case-insensitive
        assert_eq!(
            skip_reason("9", "subyxhub", "long enough body text", &history, "SubyxHub", 10),
            Some(SkipReason::OwnPost)
        );
    }

    #[test]
    fn short_bodies_are_ineligible() {
        let history = History::new();
        assert_eq!(
            skip_reason("9", "someone", "too short", &history, "SubyxHub", 10),
            Some(SkipReason::TooShort)
        );
    }

    #[test]
    fn unknown_author_does_not_trip_self_filter() {
        let history = History::new();
        assert_eq!(
            skip_reason("9", "", "long enough body text", &history, "SubyxHub", 10),
            None
        );
    }

    #[test]
    fn five_consecutive_empty_scans_trip_the_threshold() {
        let mut state = BotState::default();
        for _ in 0..4 {
            assert!(!state.record_empty_scan(5));
        }
        assert!(state.record_empty_scan(5));
    }

    #[test]
    fn a_populated_scan_resets_the_empty_streak() {
        let mut state = BotState::default();
        for _ in 0..4 {
            state.record_empty_scan(5);
        }
        state.record_posts_seen();
        assert!(!state.record_empty_scan(5));
        assert_eq!(state.consecutive_empty_scans, 1);
    }
}

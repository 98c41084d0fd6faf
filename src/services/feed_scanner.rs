//! Feed scanning - business capability layer
//!
//! Queries the live DOM for rendered posts and extracts the id, author and
//! body text of each one. Extraction is deliberately forgiving: any post
//! whose anchors or text cannot be read, or whose body is too short to be a
//! real text post, is skipped at debug level without failing the scan.

use regex::Regex;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SessionError;
use crate::infrastructure::Dom;
use crate::models::PostHandle;
use crate::services::history_store::History;

/// Rendered feed entries
const POST_SELECTOR: &str = "article[data-testid='tweet']";
/// Permalink anchor inside a post, carries the status id
const PERMALINK_SELECTOR: &str = "a[href*='/status/']";
/// Body text container inside a post
const BODY_SELECTOR: &str = "div[data-testid='tweetText']";
/// Author block inside a post; its first anchor links to the profile
const AUTHOR_SELECTOR: &str = "div[data-testid='User-Name'] a[href^='/']";

/// Reload failures tolerated in the wait loop before declaring the
/// session dead
const MAX_RELOAD_FAILURES: usize = 5;

pub struct FeedScanner {
    min_text_len: usize,
    status_re: Regex,
}

impl FeedScanner {
    pub fn new(config: &Config) -> Self {
        Self {
            min_text_len: config.min_post_text_len,
            status_re: Regex::new(r"/status/(\d+)").expect("status id pattern is valid"),
        }
    }

    /// Reload and scroll the feed so the virtualized list actually renders.
    ///
    /// The bottom/top/bottom/top dance looks redundant but is load-bearing:
    /// without it lazy-rendered feeds frequently come back empty.
    pub async fn force_render(&self, dom: &Dom) {
        if let Err(e) = dom.reload().await {
            warn!("feed reload failed: {}", e);
        }
        sleep(Duration::from_secs(2)).await;

        let _ = dom.scroll_to_bottom().await;
        sleep(Duration::from_secs(2)).await;
        let _ = dom.scroll_to_top().await;
        sleep(Duration::from_secs(1)).await;
        let _ = dom.scroll_to_bottom().await;
        sleep(Duration::from_secs(2)).await;
        let _ = dom.scroll_to_top().await;
        sleep(Duration::from_secs(1)).await;
    }

    /// Snapshot of the posts currently rendered, in document order
    ///
    /// The returned handles are only valid until the next reload or
    /// navigation.
    pub async fn scan(&self, dom: &Dom) -> Vec<PostHandle> {
        let articles = dom.find_all(POST_SELECTOR).await;
        debug!("{} article elements rendered", articles.len());

        let mut posts = Vec::new();
        for (idx, element) in articles.into_iter().enumerate() {
            if let Some(post) = self.extract(element, idx).await {
                posts.push(post);
            }
        }
        posts
    }

    /// Pull id, author and body out of one article element
    ///
    /// Any missing piece makes the post ineligible, not an error.
    async fn extract(&self, element: chromiumoxide::Element, idx: usize) -> Option<PostHandle> {
        let link = element.find_element(PERMALINK_SELECTOR).await.ok()?;
        let href = link.attribute("href").await.ok().flatten()?;
        let post_id = match self.parse_status_id(&href) {
            Some(id) => id,
            None => {
                debug!("post {}: no status id in href '{}'", idx, href);
                return None;
            }
        };

        let body = match element.find_element(BODY_SELECTOR).await {
            Ok(body_el) => body_el
                .inner_text()
                .await
                .ok()
                .flatten()
                .unwrap_or_default()
                .trim()
                .to_string(),
            Err(_) => {
                debug!("post {}: no text body", idx);
                return None;
            }
        };

        if body.chars().count() < self.min_text_len {
            debug!("post {}: body too short ({} chars)", idx, body.chars().count());
            return None;
        }

        let author_handle = match element.find_element(AUTHOR_SELECTOR).await {
            Ok(author_el) => author_el
                .attribute("href")
                .await
                .ok()
                .flatten()
                .map(|href| {
                    href.trim_start_matches('/')
                        .split('/')
                        .next()
                        .unwrap_or_default()
                        .to_string()
                })
                .unwrap_or_default(),
            Err(_) => String::new(),
        };

        Some(PostHandle {
            element,
            post_id,
            author_handle,
            body_text: body,
        })
    }

    /// Descendant-link check for the bot's own posts and reposts; mirrors
    /// the author-handle comparison but also catches quoted/own threads
    pub async fn is_own_post(&self, post: &PostHandle, own_handle: &str) -> bool {
        let selector = format!("a[href*='/{}']", own_handle);
        post.element.find_element(selector.as_str()).await.is_ok()
    }

    /// Block until a post outside `exclude` shows up, reloading the feed at
    /// the given interval.
    ///
    /// Intentionally has no overall timeout: after a successful reply the
    /// loop is supposed to sit here for as long as the feed stays quiet.
    /// Only a dead driver breaks the wait.
    pub async fn wait_for_new_post(
        &self,
        dom: &Dom,
        exclude: &History,
        interval_secs: u64,
    ) -> Result<PostHandle, SessionError> {
        info!("Waiting for a new post...");

        let mut reload_failures = 0usize;
        loop {
            sleep(Duration::from_secs(interval_secs)).await;

            if let Err(e) = dom.reload().await {
                reload_failures += 1;
                warn!(
                    "feed reload failed while waiting ({}/{}): {}",
                    reload_failures, MAX_RELOAD_FAILURES, e
                );
                if reload_failures >= MAX_RELOAD_FAILURES {
                    return Err(SessionError::Lost(e.to_string()));
                }
                continue;
            }
            reload_failures = 0;

            // allow the feed to render
            sleep(Duration::from_secs(3)).await;

            for post in self.scan(dom).await {
                if !exclude.contains_key(&post.post_id) {
                    info!("New post found: {}", post.post_id);
                    return Ok(post);
                }
            }
        }
    }

    fn parse_status_id(&self, href: &str) -> Option<String> {
        self.status_re
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> FeedScanner {
        FeedScanner::new(&Config::default())
    }

    #[test]
    fn parses_status_id_from_plain_href() {
        assert_eq!(
            scanner().parse_status_id("/someuser/status/1234567890123"),
            Some("1234567890123".to_string())
        );
    }

    #[test]
    fn parses_status_id_with_query_suffix() {
        assert_eq!(
            scanner().parse_status_id("https://x.com/a/status/987654321?s=20"),
            Some("987654321".to_string())
        );
    }

    #[test]
    fn href_without_status_yields_none() {
        assert_eq!(scanner().parse_status_id("/someuser/photo/1"), None);
    }
}

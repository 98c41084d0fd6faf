//! Live-browser integration tests
//!
//! These need a real browser (and for the full flow, a logged-in session),
//! so they are ignored by default. Run manually:
//!
//! ```bash
//! cargo test -- --ignored --nocapture
//! ```

use timeline_reply_bot::browser::launch_browser;
use timeline_reply_bot::services::FeedScanner;
use timeline_reply_bot::utils::logging;
use timeline_reply_bot::{Config, Dom};

#[tokio::test]
#[ignore] // needs a local Chrome install
async fn test_browser_launch() {
    let _ = logging::init("test_run.log");

    let config = Config::from_env();
    let result = launch_browser(&config.feed_url, config.chrome_path.as_deref()).await;

    assert!(result.is_ok(), "browser should launch and open the feed URL");

    if let Ok((mut browser, _page)) = result {
        let _ = browser.close().await;
    }
}

#[tokio::test]
#[ignore] // needs a logged-in session on the feed
async fn test_feed_scan_returns_posts() {
    let _ = logging::init("test_run.log");

    let config = Config::from_env();
    let (mut browser, page) = launch_browser(&config.feed_url, config.chrome_path.as_deref())
        .await
        .expect("browser launch failed");
    let dom = Dom::new(page);

    // operator must be logged in already for this to find anything
    let scanner = FeedScanner::new(&config);
    scanner.force_render(&dom).await;
    let posts = scanner.scan(&dom).await;

    println!("scanned {} posts", posts.len());
    for post in posts.iter().take(5) {
        println!("  {} @{}: {}", post.post_id, post.author_handle, post.body_text);
        assert!(!post.post_id.is_empty());
        assert!(post.body_text.chars().count() >= config.min_post_text_len);
    }

    let _ = browser.close().await;
}

#[tokio::test]
#[ignore] // full manual end-to-end: browser + login + one reply
async fn test_single_pass_end_to_end() {
    let _ = logging::init("test_run.log");

    let config = Config::from_env();
    assert!(
        !config.openai_api_key.is_empty(),
        "OPENAI_API_KEY must be set for the end-to-end test"
    );

    let app = timeline_reply_bot::App::initialize(config)
        .await
        .expect("app initialization failed");

    // runs until the daily cap / empty-scan threshold; interrupt manually
    app.run().await.expect("bot run failed");
}

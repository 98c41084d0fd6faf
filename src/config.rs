/// Runtime configuration
///
/// Every field can be overridden through the environment; anything not set
/// falls back to the defaults below. A `.env` file is loaded at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// The bot's own handle, used for self-authorship filtering
    pub bot_handle: String,
    /// Feed URL opened at startup (login + timeline)
    pub feed_url: String,
    /// Path of the reply-history JSON file
    pub history_file: String,
    /// Daily reply cap; `None` means unbounded
    pub max_daily_replies: Option<usize>,
    /// Consecutive zero-post scans tolerated before giving up
    pub max_empty_scans: usize,
    /// Poll interval (seconds) while waiting for a new post
    pub new_post_poll_secs: u64,
    /// Minimum body length for a post to be worth replying to
    pub min_post_text_len: usize,
    /// Attach to an already-running browser instead of launching one
    pub browser_debug_port: Option<u16>,
    /// Explicit Chrome/Chromium executable path (optional)
    pub chrome_path: Option<String>,
    // --- generation backend ---
    pub openai_api_key: String,
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_handle: "SubyxHub".to_string(),
            feed_url: "https://x.com".to_string(),
            history_file: "comment_history.json".to_string(),
            max_daily_replies: None,
            max_empty_scans: 5,
            new_post_poll_secs: 5,
            min_post_text_len: 10,
            browser_debug_port: None,
            chrome_path: None,
            openai_api_key: String::new(),
            llm_api_base_url: None,
            llm_model_name: "gpt-4.1-mini".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bot_handle: std::env::var("BOT_HANDLE").unwrap_or(default.bot_handle),
            feed_url: std::env::var("FEED_URL").unwrap_or(default.feed_url),
            history_file: std::env::var("HISTORY_FILE").unwrap_or(default.history_file),
            max_daily_replies: std::env::var("MAX_DAILY_REPLIES").ok().and_then(|v| v.parse().ok()),
            max_empty_scans: std::env::var("MAX_EMPTY_SCANS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_empty_scans),
            new_post_poll_secs: std::env::var("NEW_POST_POLL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.new_post_poll_secs),
            min_post_text_len: std::env::var("MIN_POST_TEXT_LEN").ok().and_then(|v| v.parse().ok()).unwrap_or(default.min_post_text_len),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()),
            chrome_path: std::env::var("CHROME_PATH").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or(default.openai_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").ok(),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.max_empty_scans, 5);
        assert_eq!(config.min_post_text_len, 10);
        assert!(config.max_daily_replies.is_none());
    }

    #[test]
    fn env_free_config_has_no_api_key() {
        assert!(Config::default().openai_api_key.is_empty());
    }
}

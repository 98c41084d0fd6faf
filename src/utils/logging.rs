//! Logging setup and small text helpers
//!
//! Every run writes to stdout and to its own timestamped log file.

use std::fs::File;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Name of the per-run log file, derived from the process start time
pub fn run_log_file_name() -> String {
    format!(
        "reply_bot_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Install the global subscriber: one ANSI layer on stdout, one plain-text
/// layer appending to `log_file_path`. Default level is `info`, overridable
/// with `RUST_LOG`.
pub fn init(log_file_path: &str) -> Result<()> {
    let file = File::create(log_file_path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| anyhow::anyhow!("logging init failed: {}", e))?;

    Ok(())
}

/// Truncate long text for log display
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_text("hello", 10), "hello");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let text = "a".repeat(20);
        let cut = truncate_text(&text, 5);
        assert_eq!(cut, "aaaaa...");
    }

    #[test]
    fn log_file_name_has_timestamp_shape() {
        let name = run_log_file_name();
        assert!(name.starts_with("reply_bot_"));
        assert!(name.ends_with(".log"));
    }
}

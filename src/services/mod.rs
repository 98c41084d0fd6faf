pub mod compose_submitter;
pub mod feed_scanner;
pub mod history_store;
pub mod reply_generator;
pub mod verifier;

pub use compose_submitter::ComposeSubmitter;
pub use feed_scanner::FeedScanner;
pub use history_store::{History, HistoryRecord, HistoryStore};
pub use reply_generator::ReplyGenerator;
pub use verifier::{SubmissionVerifier, Verification};

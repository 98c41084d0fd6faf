//! # Timeline Reply Bot
//!
//! Watches a live social-feed timeline, generates a short contextual reply
//! for each new post via a chat-completion backend, submits it through the
//! third-party web UI, verifies the submission, and records the outcome so
//! no post is ever replied to twice.
//!
//! ## Architecture
//!
//! Strict layering, leaves first:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - holds the scarce resource (the page) and exposes
//!   only capabilities: JS eval, element lookup, navigation, scroll
//!
//! ### ② Business capabilities (services)
//! - `services/` - single-post capabilities, no flow knowledge
//! - `HistoryStore` - durable already-replied record
//! - `ReplyGenerator` - one prompt in, one reply out
//! - `FeedScanner` - snapshot of rendered posts + wait-for-new
//! - `ComposeSubmitter` - compose modal state machine
//! - `SubmissionVerifier` - best-effort landed-or-not judgement
//!
//! ### ③ Workflow
//! - `workflow/` - the complete handling of one post
//! - `PostCtx` - which post, at which position (for logs)
//! - `ReplyFlow` - submit → verify → single outcome
//!
//! ### ④ Orchestration
//! - `orchestrator/bot_loop` - feed passes, dedup, persistence ordering,
//!   empty-scan failure threshold, one reply per observed new post

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use app::App;
pub use config::Config;
pub use error::{GenerationError, SessionError};
pub use infrastructure::Dom;
pub use models::{PostHandle, ReplyAttempt, SendMethod};
pub use orchestrator::{BotLoop, BotState};
pub use services::{
    ComposeSubmitter, FeedScanner, History, HistoryRecord, HistoryStore, ReplyGenerator,
    SubmissionVerifier, Verification,
};
pub use workflow::{PostCtx, ReplyFlow, ReplyOutcome};

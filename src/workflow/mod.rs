pub mod post_ctx;
pub mod reply_flow;

pub use post_ctx::PostCtx;
pub use reply_flow::{ReplyFlow, ReplyOutcome};

pub mod bot_loop;

pub use bot_loop::{skip_reason, BotLoop, BotState, SkipReason};

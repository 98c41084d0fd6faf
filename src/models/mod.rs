pub mod post;

pub use post::{PostHandle, ReplyAttempt, SendMethod};

//! Post and reply-attempt types

use chromiumoxide::Element;

/// One feed entry as currently rendered
///
/// Holds the live DOM element plus the data extracted from it. Valid only
/// until the next reload or navigation; never keep one across a feed refresh.
pub struct PostHandle {
    /// The rendered `article` element backing this post
    pub element: Element,
    /// Unique status id parsed from the post permalink
    pub post_id: String,
    /// Author handle (without the leading '@'); empty when not extractable
    pub author_handle: String,
    /// Visible body text of the post
    pub body_text: String,
}

impl PostHandle {
    /// Short id prefix for log lines
    pub fn id_prefix(&self) -> &str {
        let end = self.post_id.len().min(12);
        &self.post_id[..end]
    }
}

/// How a reply ended up being submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMethod {
    /// One of the send-button strategies was triggered
    ButtonClick,
    /// The Ctrl+Enter fallback was used
    KeyboardShortcut,
}

/// Terminal outcome of one submission attempt
///
/// Every failure path of the compose state machine ends in one of these; the
/// submitter never surfaces driver errors directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAttempt {
    /// The reply was typed and a send affordance was triggered
    Sent { reply: String, method: SendMethod },
    /// The compose surface never opened
    ComposeFailed,
    /// The generation backend failed or returned nothing usable
    GenerationFailed,
    /// Typing failed, or no send affordance could be triggered
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sent_attempt_carries_reply_and_method() {
        let attempt = ReplyAttempt::Sent {
            reply: "sounds good".to_string(),
            method: SendMethod::ButtonClick,
        };
        match attempt {
            ReplyAttempt::Sent { reply, method } => {
                assert_eq!(reply, "sounds good");
                assert_eq!(method, SendMethod::ButtonClick);
            }
            _ => panic!("expected Sent"),
        }
    }
}

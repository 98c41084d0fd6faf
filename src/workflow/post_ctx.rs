//! Post processing context
//!
//! Carries "which post, at which position in this pass" for log lines.

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct PostCtx {
    /// Id of the post being processed
    pub post_id: String,
    /// Position within the current pass (1-based, display only)
    pub index: usize,
    /// Number of posts in the current pass
    pub total: usize,
}

impl PostCtx {
    pub fn new(post_id: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            post_id: post_id.into(),
            index,
            total,
        }
    }
}

impl Display for PostCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[post {}/{} id#{}]", self.index, self.total, self.post_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_position_and_id() {
        let ctx = PostCtx::new("123456", 2, 7);
        assert_eq!(ctx.to_string(), "[post 2/7 id#123456]");
    }
}

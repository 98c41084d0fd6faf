//! Reply generation - business capability layer
//!
//! Wraps the chat-completion backend behind a single `generate` call. Each
//! invocation picks a random style directive so repeated replies do not all
//! read the same. Backend failures come back as `GenerationError` values;
//! the caller treats them as skip-this-post, never as fatal.
//!
//! ## Stack
//! - `async-openai` client, compatible with any OpenAI-style endpoint
//! - custom API base and model name via config

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;

/// Style directives, one chosen uniformly per reply to vary tone
pub const REPLY_STYLES: &[&str] = &[
    "short opinion",
    "casual observation",
    "neutral comment",
    "light suggestion",
    "soft recommendation",
];

pub struct ReplyGenerator {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl ReplyGenerator {
    pub fn new(config: &Config) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.openai_api_key);
        if let Some(base) = &config.llm_api_base_url {
            openai_config = openai_config.with_api_base(base);
        }

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        }
    }

    /// Generate one short reply for the given post text
    ///
    /// Makes exactly one backend call. An empty completion counts as a
    /// failure, so the caller never tries to type a blank reply.
    pub async fn generate(&self, tweet_text: &str) -> Result<String, GenerationError> {
        let style = Self::pick_style();
        let prompt = Self::build_prompt(tweet_text, style);

        debug!("generating reply, style: '{}', model: {}", style, self.model_name);

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationError::Api(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.9)
            .max_tokens(80u32)
            .build()
            .map_err(|e| GenerationError::Api(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("generation backend error: {}", e);
            GenerationError::Api(e.to_string())
        })?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(GenerationError::Empty)?;

        let reply = content.trim().to_string();
        if reply.is_empty() {
            return Err(GenerationError::Empty);
        }

        Ok(reply)
    }

    fn pick_style() -> &'static str {
        REPLY_STYLES
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(REPLY_STYLES[0])
    }

    /// Prompt with the source text, the style directive and the fixed
    /// content rules
    fn build_prompt(tweet_text: &str, style: &str) -> String {
        format!(
            r#"Tweet: {tweet_text}
Reply style: {style}

Write a short casual reply (under 20 words).
Reply rules:
- Mention CryptoGem OR play-to-earn OR Solana (not all every time)
- Mention @cryptogemapp only if it fits naturally
- No hashtags
- Human tone, small typo allowed
- Keep it neutral, not hype
- Use a different phrasing than previous replies
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn prompt_embeds_tweet_and_style() {
        let prompt = ReplyGenerator::build_prompt("Great news about the market", "short opinion");
        assert!(prompt.contains("Great news about the market"));
        assert!(prompt.contains("Reply style: short opinion"));
        assert!(prompt.contains("No hashtags"));
        assert!(prompt.contains("under 20 words"));
    }

    #[test]
    fn style_choice_actually_varies() {
        // Statistical: 200 draws from 5 styles should not all be identical
        let drawn: HashSet<&str> = (0..200).map(|_| ReplyGenerator::pick_style()).collect();
        assert!(drawn.len() > 1, "expected more than one style in 200 draws");
        for style in &drawn {
            assert!(REPLY_STYLES.contains(style));
        }
    }

    #[test]
    fn prompts_for_same_tweet_are_not_all_identical() {
        let prompts: HashSet<String> = (0..100)
            .map(|_| {
                ReplyGenerator::build_prompt("same input text", ReplyGenerator::pick_style())
            })
            .collect();
        assert!(prompts.len() > 1);
    }

    /// Live backend call; run manually:
    /// `cargo test generate_live -- --ignored --nocapture`
    #[tokio::test]
    #[ignore]
    async fn generate_live() {
        let mut config = Config::from_env();
        if config.openai_api_key.is_empty() {
            panic!("OPENAI_API_KEY must be set for this test");
        }
        config.llm_model_name = "gpt-4.1-mini".to_string();

        let generator = ReplyGenerator::new(&config);
        let reply = generator
            .generate("Solana gaming tokens are moving again today")
            .await
            .expect("generation should succeed");

        println!("generated reply: {}", reply);
        assert!(!reply.is_empty());
    }
}

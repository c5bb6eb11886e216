//! Lesson Content Generation
//!
//! This module defines the contract for turning a lesson topic into
//! deliverable lesson text, and an implementation backed by any
//! OpenAI-compatible chat completion API.

use crate::prompt;
use anyhow::{Context, Result, bail};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;

/// Defines the contract for any service that can write a lesson.
///
/// The returned text follows the four-section structure requested by
/// the prompt template; callers treat it as opaque deliverable content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LessonGenerator: Send + Sync {
    /// Generates the full lesson text for a given topic.
    async fn generate_lesson(&self, topic: &str) -> Result<String>;
}

/// A `LessonGenerator` backed by an OpenAI-compatible API.
///
/// Works against OpenAI directly or against Gemini through its
/// OpenAI-compatibility endpoint; the provider is selected purely by
/// the base URL in the supplied configuration.
pub struct OpenAICompatibleGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleGenerator {
    /// Creates a new generator.
    ///
    /// # Arguments
    ///
    /// * `config` - OpenAI client configuration (API key, base URL).
    /// * `model` - Model identifier to use for generation (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl LessonGenerator for OpenAICompatibleGenerator {
    async fn generate_lesson(&self, topic: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(prompt::SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt::lesson_prompt(topic))
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .as_ref()
            .context("No content in LLM response")?;

        if content.trim().is_empty() {
            bail!("LLM returned an empty lesson for topic '{}'", topic);
        }

        Ok(content.clone())
    }
}

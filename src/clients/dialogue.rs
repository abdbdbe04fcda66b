//! Bot runtime client module
//!
//! Encapsulates the Lex V2 `RecognizeText` call. Retry policy lives with the
//! invoker handler, not here; a single call maps to a single attempt.

use async_trait::async_trait;
use tracing::info;

use crate::core::config::InvokerConfig;
use crate::core::models::BotReply;
use crate::errors::HandlerError;

/// Sends one utterance to the conversational bot runtime.
#[async_trait]
pub trait DialogueService: Send + Sync {
    async fn recognize_text(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<BotReply, HandlerError>;
}

/// Lex V2 implementation of [`DialogueService`].
pub struct LexDialogue {
    client: aws_sdk_lexruntimev2::Client,
    config: InvokerConfig,
}

impl LexDialogue {
    #[must_use]
    pub fn new(sdk_config: &aws_config::SdkConfig, config: InvokerConfig) -> Self {
        Self {
            client: aws_sdk_lexruntimev2::Client::new(sdk_config),
            config,
        }
    }
}

#[async_trait]
impl DialogueService for LexDialogue {
    async fn recognize_text(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<BotReply, HandlerError> {
        info!(bot_id = %self.config.bot_id, session_id = %session_id, "Sending text to bot runtime");

        let response = self
            .client
            .recognize_text()
            .bot_id(&self.config.bot_id)
            .bot_alias_id(&self.config.bot_alias_id)
            .locale_id(&self.config.locale_id)
            .session_id(session_id)
            .text(text)
            .send()
            .await
            .map_err(|e| HandlerError::Dialogue(e.to_string()))?;

        let messages = response
            .messages()
            .iter()
            .filter_map(|message| message.content().map(ToString::to_string))
            .collect();

        Ok(BotReply { messages })
    }
}

use std::env;

/// Region the knowledge base and bot are deployed in.
pub const REGION: &str = "eu-west-2";

/// Foundation model used for grounded answer generation.
pub const MODEL_ARN: &str =
    "arn:aws:bedrock:eu-west-2::foundation-model/anthropic.claude-3-sonnet-20240229-v1:0";

/// Passages retrieved from the knowledge base per query.
pub const RETRIEVAL_RESULT_COUNT: i32 = 5;

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub knowledge_base_id: String,
}

impl QueryConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            knowledge_base_id: env::var("KNOWLEDGE_BASE_ID")
                .map_err(|e| format!("KNOWLEDGE_BASE_ID: {}", e))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct InvokerConfig {
    pub bot_id: String,
    pub bot_alias_id: String,
    pub locale_id: String,
}

impl InvokerConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            bot_id: env::var("BOT_ID").map_err(|e| format!("BOT_ID: {}", e))?,
            bot_alias_id: env::var("BOT_ALIAS_ID").map_err(|e| format!("BOT_ALIAS_ID: {}", e))?,
            locale_id: env::var("LOCALE_ID").map_err(|e| format!("LOCALE_ID: {}", e))?,
        })
    }
}

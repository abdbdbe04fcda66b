use serde::Serialize;

/// Grounded answer produced by the generation service for one question.
#[derive(Debug, Clone)]
pub struct RetrievalReply {
    pub answer: String,
    pub session_id: String,
    pub citations: Vec<CitationRecord>,
}

/// Source document reference grounding part of a generated answer.
#[derive(Debug, Clone, Serialize)]
pub struct CitationRecord {
    pub source: Option<String>,
    pub content: Option<String>,
}

/// Ordered reply messages from one bot-runtime exchange.
#[derive(Debug, Clone)]
pub struct BotReply {
    pub messages: Vec<String>,
}

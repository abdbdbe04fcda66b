//! Invocation event classification.
//!
//! Every incoming payload is classified once, before any business logic runs,
//! into one of the two supported calling conventions. Handlers dispatch on the
//! result instead of probing the raw JSON ad hoc.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::HandlerError;

/// Slot the dialogue runtime fills with the user's question.
const QUERY_SLOT: &str = "QuerySlot";

/// Calling convention that produced an invocation payload.
#[derive(Debug)]
pub enum ClassifiedEvent {
    /// Fulfillment event from the Lex V2 dialogue runtime.
    BotFramework(BotFrameworkEvent),
    /// Direct API Gateway proxy request.
    HttpGateway(HttpGatewayEvent),
    /// Payload matching neither convention.
    Invalid,
}

/// Classifies a raw invocation payload.
///
/// A payload carrying both a `bot` identity and a `sessionState` structure is
/// a dialogue-runtime fulfillment event; any other JSON object is treated as
/// an API Gateway request. Exactly one shape is active per invocation.
#[must_use]
pub fn classify(payload: &Value) -> ClassifiedEvent {
    if !payload.is_object() {
        return ClassifiedEvent::Invalid;
    }

    if payload.get("bot").is_some() && payload.get("sessionState").is_some() {
        return match serde_json::from_value::<BotFrameworkEvent>(payload.clone()) {
            Ok(event) => ClassifiedEvent::BotFramework(event),
            Err(_) => ClassifiedEvent::Invalid,
        };
    }

    let body = payload
        .get("body")
        .and_then(Value::as_str)
        .map(ToString::to_string);

    ClassifiedEvent::HttpGateway(HttpGatewayEvent { body })
}

/// Lex V2 fulfillment event, reduced to the fields the handlers consume.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotFrameworkEvent {
    pub session_state: SessionState,
    #[serde(default)]
    pub input_transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionState {
    pub intent: Intent,
}

#[derive(Debug, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Option<Slot>>,
}

#[derive(Debug, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<SlotValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotValue {
    #[serde(default)]
    pub interpreted_value: Option<String>,
}

impl BotFrameworkEvent {
    #[must_use]
    pub fn intent_name(&self) -> &str {
        &self.session_state.intent.name
    }

    /// The question to forward. The interpreted slot value takes precedence
    /// over the raw transcript; both are trimmed, and blank values fall
    /// through.
    #[must_use]
    pub fn question(&self) -> Option<String> {
        let slot = self
            .session_state
            .intent
            .slots
            .get(QUERY_SLOT)
            .and_then(Option::as_ref)
            .and_then(|slot| slot.value.as_ref())
            .and_then(|value| value.interpreted_value.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty());

        let transcript = self
            .input_transcript
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        slot.or(transcript).map(ToString::to_string)
    }
}

/// API Gateway proxy request, carrying the raw JSON-encoded body.
#[derive(Debug)]
pub struct HttpGatewayEvent {
    body: Option<String>,
}

impl HttpGatewayEvent {
    /// Parses the request body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `MissingBody` when no body is present and `InvalidJson` when it
    /// does not parse.
    pub fn parse_body(&self) -> Result<Value, HandlerError> {
        let raw = self.body.as_deref().ok_or(HandlerError::MissingBody)?;
        let body = serde_json::from_str(raw)?;
        Ok(body)
    }

    /// Extracts the trimmed `question` field from the request body.
    ///
    /// # Errors
    ///
    /// Propagates body errors from [`Self::parse_body`] and returns
    /// `QuestionRequired` when the field is absent or blank.
    pub fn question(&self) -> Result<String, HandlerError> {
        let body = self.parse_body()?;
        question_from_body(&body)
    }
}

/// Extracts the trimmed, non-empty `question` field from a parsed body.
///
/// # Errors
///
/// Returns `QuestionRequired` when the field is absent or blank.
pub fn question_from_body(body: &Value) -> Result<String, HandlerError> {
    let question = body
        .get("question")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if question.is_empty() {
        return Err(HandlerError::QuestionRequired);
    }

    Ok(question.to_string())
}

//! Query Lambda handler - answers questions from the knowledge base.
//!
//! This module handles:
//! - Event classification (Lex V2 fulfillment vs API Gateway)
//! - Question extraction and validation
//! - The retrieve-and-generate call and response shaping per convention

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::clients::{BedrockGeneration, GenerationService};
use crate::core::config::{QueryConfig, REGION};
use crate::errors::HandlerError;
use crate::event::{BotFrameworkEvent, ClassifiedEvent, HttpGatewayEvent, classify};
use crate::responses;

pub use self::function_handler as handler;

/// Persona instruction prepended to every question before generation.
const PERSONA_PREAMBLE: &str = "You are the Totem documentation assistant. \
    Answer using only the retrieved documentation. \
    If the documentation does not contain the answer, say that you do not know.";

/// Shown when generation succeeds but returns no text.
const EMPTY_ANSWER_FALLBACK: &str = "I couldn't find a specific answer.";

/// Generic failure message; upstream detail is never exposed by default.
const GENERIC_FAILURE: &str = "Failed to process question";

/// Lambda handler for the Query entrypoint.
///
/// Builds the Bedrock client for this invocation and delegates to
/// [`handle_event`].
///
/// # Errors
///
/// Fails the invocation only when configuration is missing; every
/// request-scoped failure is returned as a shaped response payload.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = QueryConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(REGION))
        .load()
        .await;
    let service = BedrockGeneration::new(&sdk_config, config);

    Ok(handle_event(&service, &event.payload).await)
}

/// Classifies the incoming event and dispatches to the matching calling
/// convention. Every outcome is a shaped response; no error propagates.
pub async fn handle_event(service: &dyn GenerationService, payload: &Value) -> Value {
    match classify(payload) {
        ClassifiedEvent::BotFramework(event) => handle_bot_framework(service, &event).await,
        ClassifiedEvent::HttpGateway(event) => handle_http(service, &event).await,
        ClassifiedEvent::Invalid => {
            error!("Unrecognized invocation payload");
            responses::http_err(400, "invalid request payload")
        }
    }
}

async fn handle_bot_framework(
    service: &dyn GenerationService,
    event: &BotFrameworkEvent,
) -> Value {
    let intent_name = event.intent_name();

    let Some(question) = event.question() else {
        info!(intent = %intent_name, "No question in slot or transcript");
        return responses::lex_failed(Some(intent_name), "No query provided");
    };

    match service.retrieve_and_generate(&augment(&question)).await {
        Ok(reply) => {
            let answer = if reply.answer.trim().is_empty() {
                EMPTY_ANSWER_FALLBACK
            } else {
                &reply.answer
            };
            // Citations are not representable in this convention and are dropped.
            responses::lex_fulfilled(intent_name, &reply.session_id, answer)
        }
        Err(e) => {
            error!("Generation call failed: {}", e);
            responses::lex_failed(Some(intent_name), GENERIC_FAILURE)
        }
    }
}

async fn handle_http(service: &dyn GenerationService, event: &HttpGatewayEvent) -> Value {
    let question = match event.question() {
        Ok(question) => question,
        Err(e) => {
            info!("Rejected request: {}", e);
            return responses::http_err(e.status_code(), &e.to_string());
        }
    };

    match service.retrieve_and_generate(&augment(&question)).await {
        Ok(reply) => {
            let mut body = json!({
                "answer": reply.answer,
                "sessionId": reply.session_id,
            });
            if !reply.citations.is_empty() {
                body["citations"] = serde_json::to_value(&reply.citations).unwrap_or_default();
            }
            responses::http_ok(&body)
        }
        Err(e) => {
            error!("Generation call failed: {}", e);
            generation_failure_response(&e)
        }
    }
}

#[cfg(not(feature = "debug-logs"))]
fn generation_failure_response(_error: &HandlerError) -> Value {
    responses::http_err(500, GENERIC_FAILURE)
}

#[cfg(feature = "debug-logs")]
fn generation_failure_response(error: &HandlerError) -> Value {
    responses::http_err_with_details(500, GENERIC_FAILURE, &error.to_string())
}

fn augment(question: &str) -> String {
    format!("{PERSONA_PREAMBLE}\n\n{question}")
}

//! Invoker Lambda handler - relays free text to the bot runtime.
//!
//! This module handles:
//! - Request body validation
//! - Session id selection (caller-supplied or freshly generated)
//! - The recognize-text call with bounded exponential backoff

use std::sync::atomic::{AtomicUsize, Ordering};

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::clients::{DialogueService, LexDialogue};
use crate::core::config::{InvokerConfig, REGION};
use crate::core::models::BotReply;
use crate::errors::HandlerError;
use crate::event::{ClassifiedEvent, classify, question_from_body};
use crate::responses;

pub use self::function_handler as handler;

/// Total attempts against the bot runtime, including the first.
const MAX_ATTEMPTS: usize = 3;

/// Lambda handler for the Invoker entrypoint.
///
/// Builds the Lex client for this invocation and delegates to
/// [`handle_event`].
///
/// # Errors
///
/// Fails the invocation only when configuration is missing; every
/// request-scoped failure is returned as a shaped response payload.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = InvokerConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(REGION))
        .load()
        .await;
    let service = LexDialogue::new(&sdk_config, config);

    Ok(handle_event(&service, &event.payload).await)
}

/// Validates the request, relays the question to the bot runtime with
/// bounded retry, and surfaces the first reply message.
pub async fn handle_event(service: &dyn DialogueService, payload: &Value) -> Value {
    let ClassifiedEvent::HttpGateway(event) = classify(payload) else {
        error!("Unrecognized invocation payload");
        return responses::http_err(400, "invalid request payload");
    };

    let body = match event.parse_body() {
        Ok(body) => body,
        Err(e) => {
            info!("Rejected request: {}", e);
            return responses::http_err(e.status_code(), &e.to_string());
        }
    };

    let question = match question_from_body(&body) {
        Ok(question) => question,
        Err(e) => {
            info!("Rejected request: {}", e);
            return responses::http_err(e.status_code(), &e.to_string());
        }
    };

    let session_id = session_id_from_body(&body);

    let reply = match recognize_with_retry(service, &session_id, &question).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Bot runtime call failed: {}", e);
            return responses::http_err_with_details(
                e.status_code(),
                "Internal server error",
                &e.to_string(),
            );
        }
    };

    match first_message(&reply) {
        Ok(answer) => responses::http_ok(&json!({ "answer": answer })),
        Err(e) => {
            error!("Bot runtime returned no messages");
            responses::http_err(e.status_code(), &e.to_string())
        }
    }
}

/// Caller-supplied session id when the body carries a non-blank one,
/// otherwise a fresh collision-resistant id. Conversational context is only
/// preserved across calls when the caller passes the id back.
fn session_id_from_body(body: &Value) -> String {
    body.get("sessionId")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Calls the bot runtime with fixed exponential backoff: after failed attempt
/// n the delay is 2^n * 100 ms (200 ms, 400 ms), three attempts in total, no
/// jitter.
async fn recognize_with_retry(
    service: &dyn DialogueService,
    session_id: &str,
    text: &str,
) -> Result<BotReply, HandlerError> {
    let attempts = AtomicUsize::new(0);

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .take(MAX_ATTEMPTS - 1);

    let result = Retry::spawn(strategy, || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            service
                .recognize_text(session_id, text)
                .await
                .map_err(|e| {
                    warn!("Attempt {} failed: {}", attempt, e);
                    e
                })
        }
    })
    .await;

    result.map_err(|error| HandlerError::RetryExhausted {
        attempts: MAX_ATTEMPTS,
        last_error: match error {
            HandlerError::Dialogue(message) => message,
            other => other.to_string(),
        },
    })
}

/// A successful exchange must carry at least one message; only the first is
/// surfaced.
fn first_message(reply: &BotReply) -> Result<&str, HandlerError> {
    reply
        .messages
        .first()
        .map(String::as_str)
        .ok_or(HandlerError::EmptyBotReply)
}

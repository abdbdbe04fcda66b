//! Response builders for both calling conventions.
//!
//! This module provides the Lambda proxy and Lex V2 payload builders shared
//! by the query and invoker handlers.

use serde_json::{Value, json};

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
    })
}

/// Returns a 200 OK proxy response with the given JSON body.
#[must_use]
pub fn http_ok(body: &Value) -> Value {
    json!({
        "statusCode": 200,
        "headers": cors_headers(),
        "body": body.to_string(),
    })
}

/// Returns an error proxy response with the given status code and message.
#[must_use]
pub fn http_err(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_headers(),
        "body": json!({ "error": message }).to_string(),
    })
}

/// Returns an error proxy response carrying an additional detail string.
#[must_use]
pub fn http_err_with_details(status_code: u16, message: &str, details: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_headers(),
        "body": json!({ "error": message, "details": details }).to_string(),
    })
}

/// Returns a Lex V2 "Close" response with a fulfilled intent.
///
/// The generation session id rides along in `sessionAttributes` so a
/// follow-up turn can continue the same retrieval session.
#[must_use]
pub fn lex_fulfilled(intent_name: &str, session_id: &str, content: &str) -> Value {
    json!({
        "sessionState": {
            "sessionAttributes": { "bedrockSessionId": session_id },
            "dialogAction": { "type": "Close" },
            "intent": { "name": intent_name, "state": "Fulfilled" },
        },
        "messages": [{ "contentType": "PlainText", "content": content }],
    })
}

/// Returns a Lex V2 "Close" response with a failed intent.
#[must_use]
pub fn lex_failed(intent_name: Option<&str>, content: &str) -> Value {
    let mut intent = json!({ "state": "Failed" });
    if let Some(name) = intent_name {
        intent["name"] = Value::String(name.to_string());
    }

    json!({
        "sessionState": {
            "dialogAction": { "type": "Close" },
            "intent": intent,
        },
        "messages": [{ "contentType": "PlainText", "content": content }],
    })
}

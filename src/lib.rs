/// Totem - Lambda handlers that bridge callers to managed AWS AI services.
///
/// This crate implements a two-Lambda architecture for the Totem assistant:
/// 1. A Query Lambda that answers questions from a Bedrock knowledge base,
///    serving both Lex V2 fulfillment events and API Gateway requests
/// 2. An Invoker Lambda that relays free text to a Lex V2 bot with bounded
///    retry and returns the bot's first reply
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - Bedrock knowledge-base `RetrieveAndGenerate` for grounded answers
/// - Lex V2 `RecognizeText` for conversational dialogue
/// - Tokio for async runtime
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use totem::event::{ClassifiedEvent, classify};
///
/// let payload = json!({
///     "body": "{\"question\":\"What is Totem?\"}",
/// });
///
/// match classify(&payload) {
///     ClassifiedEvent::HttpGateway(event) => {
///         assert_eq!(event.question().unwrap(), "What is Totem?");
///     }
///     _ => panic!("expected an HTTP gateway event"),
/// }
/// ```
// Module declarations
pub mod clients;
pub mod core;
pub mod errors;
pub mod event;
pub mod invoker;
pub mod query;
pub mod responses;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called at the start of each Lambda
/// handler.
///
/// # Example
///
/// ```
/// // Initialize structured logging at the start of your Lambda handler
/// totem::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}

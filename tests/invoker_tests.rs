use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Value, json};
use totem::clients::DialogueService;
use totem::core::models::BotReply;
use totem::errors::HandlerError;
use totem::invoker::handle_event;

/// Fake dialogue service failing a configurable number of initial attempts.
struct FakeDialogue {
    calls: AtomicUsize,
    fail_first: usize,
    messages: Vec<String>,
    sessions: Mutex<Vec<String>>,
}

impl FakeDialogue {
    fn new(fail_first: usize, messages: &[&str]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first,
            messages: messages.iter().map(|m| (*m).to_string()).collect(),
            sessions: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DialogueService for FakeDialogue {
    async fn recognize_text(
        &self,
        session_id: &str,
        _text: &str,
    ) -> Result<BotReply, HandlerError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.sessions.lock().unwrap().push(session_id.to_string());

        if attempt <= self.fail_first {
            return Err(HandlerError::Dialogue(format!("attempt {} refused", attempt)));
        }

        Ok(BotReply {
            messages: self.messages.clone(),
        })
    }
}

fn question_payload(question: &str) -> Value {
    json!({ "body": format!("{{\"question\":\"{}\"}}", question) })
}

fn parse_http_body(response: &Value) -> Value {
    let body = response["body"]
        .as_str()
        .expect("Proxy response body should be a JSON string");
    serde_json::from_str(body).expect("Proxy response body should parse")
}

#[tokio::test]
async fn test_first_message_is_surfaced() {
    let service = FakeDialogue::new(0, &["first reply", "second reply"]);

    let response = handle_event(&service, &question_payload("hello")).await;

    assert_eq!(response["statusCode"], 200);
    let body = parse_http_body(&response);
    assert_eq!(body["answer"], "first reply");
    assert!(
        !body.to_string().contains("second reply"),
        "Only the first message is surfaced"
    );
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn test_retries_then_succeeds_with_backoff() {
    // Fails twice, succeeds on the third attempt; expected delays are
    // 200 ms and 400 ms (tolerance ±50%)
    let service = FakeDialogue::new(2, &["eventually"]);
    let started = Instant::now();

    let response = handle_event(&service, &question_payload("hello")).await;
    let elapsed = started.elapsed();

    assert_eq!(response["statusCode"], 200);
    assert_eq!(parse_http_body(&response)["answer"], "eventually");
    assert_eq!(service.call_count(), 3);
    assert!(
        elapsed >= Duration::from_millis(300),
        "Backoff too short: {:?}",
        elapsed
    );
    assert!(
        elapsed <= Duration::from_millis(1200),
        "Backoff too long: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_exhausted_retries_return_aggregated_error() {
    let service = FakeDialogue::new(usize::MAX, &[]);

    let response = handle_event(&service, &question_payload("hello")).await;

    assert_eq!(service.call_count(), 3, "Exactly three attempts are made");
    assert_eq!(response["statusCode"], 500);

    let body = parse_http_body(&response);
    assert_eq!(body["error"], "Internal server error");
    let details = body["details"].as_str().expect("Details should be present");
    assert!(details.contains("after 3 attempts"));
    assert!(details.contains("attempt 3 refused"));
}

#[tokio::test]
async fn test_empty_message_list_is_an_application_error() {
    // A successful network call with no messages is still a failure
    let service = FakeDialogue::new(0, &[]);

    let response = handle_event(&service, &question_payload("hello")).await;

    assert_eq!(response["statusCode"], 500);
    assert_eq!(
        parse_http_body(&response)["error"],
        "invalid response from bot runtime"
    );
    assert_eq!(service.call_count(), 1, "Shape validation must not retry");
}

#[tokio::test]
async fn test_missing_question_short_circuits() {
    let service = FakeDialogue::new(0, &["unused"]);
    let payload = json!({ "body": "{}" });

    let response = handle_event(&service, &payload).await;

    assert_eq!(response["statusCode"], 400);
    assert_eq!(parse_http_body(&response)["error"], "question is required");
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_json_short_circuits() {
    let service = FakeDialogue::new(0, &["unused"]);
    let payload = json!({ "body": "not json" });

    let response = handle_event(&service, &payload).await;

    assert_eq!(response["statusCode"], 400);
    assert_eq!(parse_http_body(&response)["error"], "invalid JSON format");
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_caller_supplied_session_id_is_used() {
    let service = FakeDialogue::new(0, &["ok"]);
    let payload = json!({
        "body": "{\"question\":\"hello\",\"sessionId\":\"caller-session\"}"
    });

    let response = handle_event(&service, &payload).await;

    assert_eq!(response["statusCode"], 200);
    let sessions = service.sessions.lock().unwrap();
    assert_eq!(sessions.as_slice(), ["caller-session"]);
}

#[tokio::test]
async fn test_generated_session_id_is_collision_resistant() {
    let service = FakeDialogue::new(0, &["ok"]);

    let response = handle_event(&service, &question_payload("hello")).await;

    assert_eq!(response["statusCode"], 200);
    let sessions = service.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    uuid::Uuid::parse_str(&sessions[0]).expect("Generated session id should be a UUID");
}

#[tokio::test]
async fn test_session_id_is_stable_across_retries() {
    let service = FakeDialogue::new(2, &["ok"]);

    let response = handle_event(&service, &question_payload("hello")).await;

    assert_eq!(response["statusCode"], 200);
    let sessions = service.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 3);
    assert!(
        sessions.iter().all(|s| s == &sessions[0]),
        "All attempts of one invocation share a session id"
    );
}

//! End-to-end console behavior against a scripted backend: history
//! lifecycle, replay semantics, error attribution, and rendering dispatch.

use acavox_engine::backend::CommandBackend;
use acavox_engine::console::Console;
use acavox_engine::error::DispatchError;
use acavox_engine::history::{HISTORY_CAPACITY, Outcome};
use acavox_engine::protocol::CommandResponse;
use acavox_engine::speech::{NullEngine, SpeechEngine, SpeechEvent};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;

fn response(value: serde_json::Value) -> CommandResponse {
    serde_json::from_value(value).unwrap()
}

fn students_response() -> CommandResponse {
    response(json!({
        "raw_text": "list students",
        "parsed": {"intent": "list_students", "slots": {}},
        "info": "Found 1 student(s).",
        "results_type": "students",
        "results": [{"id": 1, "name": "A", "department": "CS", "gpa": "3.5"}]
    }))
}

fn unknown_response() -> CommandResponse {
    response(json!({
        "parsed": {"intent": "unknown", "slots": {}},
        "info": "I couldn't understand this command.",
        "results_type": null,
        "results": []
    }))
}

/// Backend that replays a script of canned outcomes and records every call.
struct ScriptedBackend {
    script: VecDeque<Result<CommandResponse, DispatchError>>,
    calls: Vec<String>,
}

impl ScriptedBackend {
    fn new(script: Vec<Result<CommandResponse, DispatchError>>) -> Self {
        Self {
            script: script.into(),
            calls: Vec::new(),
        }
    }

    fn repeating_students() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl CommandBackend for ScriptedBackend {
    async fn submit(&mut self, text: &str) -> Result<CommandResponse, DispatchError> {
        self.calls.push(text.to_string());
        match self.script.pop_front() {
            Some(outcome) => outcome,
            // default to a fresh students response once the script runs out
            None => Ok(students_response()),
        }
    }
}

fn console() -> Console {
    Console::new(Box::new(NullEngine))
}

#[tokio::test]
async fn test_submit_creates_exactly_one_settled_entry() {
    let mut backend = ScriptedBackend::new(vec![Ok(students_response())]);
    let mut c = console();

    let result = c.execute_line(&mut backend, "list students").await.unwrap();
    assert!(result.success);
    assert!(result.output.contains("(1 row)"));

    assert_eq!(c.history().len(), 1);
    let entry = c.history().nth_newest(0).unwrap();
    assert_eq!(entry.text, "list students");
    assert!(entry.is_settled());
    assert!(matches!(entry.outcome, Some(Outcome::Response(_))));
}

#[tokio::test]
async fn test_empty_input_makes_no_entry_and_no_call() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    for input in ["", "   ", "\t"] {
        let err = c.execute_line(&mut backend, input).await.unwrap_err();
        assert!(
            err.to_string().contains("Empty command"),
            "unexpected error: {err}"
        );
    }

    assert_eq!(c.history().len(), 0);
    assert!(backend.calls.is_empty());
}

#[tokio::test]
async fn test_eleventh_submission_evicts_first() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    for i in 1..=11 {
        c.execute_line(&mut backend, &format!("list students {i}x"))
            .await
            .unwrap();
    }

    assert_eq!(c.history().len(), HISTORY_CAPACITY);
    assert!(c.history().iter().all(|e| e.text != "list students 1x"));
    assert_eq!(c.history().nth_newest(0).unwrap().text, "list students 11x");
}

#[tokio::test]
async fn test_run_creates_new_entry_without_mutating_original() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    c.execute_line(&mut backend, "list students").await.unwrap();
    let original_id = c.history().nth_newest(0).unwrap().id;

    let result = c.execute_line(&mut backend, "run 1").await.unwrap();
    assert!(result.success);

    assert_eq!(c.history().len(), 2);
    assert_eq!(backend.calls, vec!["list students", "list students"]);
    // the original entry is still there, untouched, one slot older
    let original = c.history().nth_newest(1).unwrap();
    assert_eq!(original.id, original_id);
    assert!(original.is_settled());
    // the re-run got its own identity
    assert_ne!(c.history().nth_newest(0).unwrap().id, original_id);
}

#[tokio::test]
async fn test_view_redisplays_without_network_call() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    c.execute_line(&mut backend, "list students").await.unwrap();
    assert_eq!(backend.calls.len(), 1);

    let result = c.execute_line(&mut backend, "view 1").await.unwrap();
    assert!(result.output.contains("(1 row)"));
    assert_eq!(backend.calls.len(), 1, "view must not call the backend");
    assert_eq!(c.history().len(), 1, "view must not create entries");
}

#[tokio::test]
async fn test_view_on_missing_entry_warns() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    let result = c.execute_line(&mut backend, "view 3").await.unwrap();
    assert!(!result.success);
    assert_eq!(backend.calls.len(), 0);
}

#[tokio::test]
async fn test_failure_is_attributed_and_inspectable() {
    let mut backend = ScriptedBackend::new(vec![
        Err(DispatchError::ServerError {
            status: 500,
            body: "internal".into(),
        }),
        Ok(students_response()),
    ]);
    let mut c = console();

    let err = c.execute_line(&mut backend, "list students").await.unwrap_err();
    assert!(err.to_string().contains("500"));

    // the failed entry settled with its error and stays inspectable
    let entry = c.history().nth_newest(0).unwrap();
    assert!(matches!(entry.outcome, Some(Outcome::Failure(_))));

    let view = c.execute_line(&mut backend, "view 1").await.unwrap();
    assert!(view.output.contains("500"));

    // the console keeps working afterwards
    let next = c.execute_line(&mut backend, "list students").await.unwrap();
    assert!(next.success);
}

#[tokio::test]
async fn test_unauthenticated_message() {
    let mut backend = ScriptedBackend::new(vec![Err(DispatchError::Unauthenticated)]);
    let mut c = console();

    let err = c.execute_line(&mut backend, "list students").await.unwrap_err();
    assert!(err.to_string().to_lowercase().contains("log in"));
}

#[tokio::test]
async fn test_unknown_intent_shows_guidance_not_error() {
    let mut backend = ScriptedBackend::new(vec![Ok(unknown_response())]);
    let mut c = console();

    let result = c.execute_line(&mut backend, "asdkjh").await.unwrap();
    assert!(result.success, "unknown intent is a valid terminal outcome");
    assert!(result.output.contains("couldn't understand"));
    assert!(result.output.contains("list students"));
}

#[tokio::test]
async fn test_empty_student_results_show_no_records() {
    let mut backend = ScriptedBackend::new(vec![Ok(response(json!({
        "parsed": {"intent": "list_students", "slots": {"course": "cs999"}},
        "info": "No students found in course cs999.",
        "results_type": "students",
        "results": []
    })))]);
    let mut c = console();

    let result = c
        .execute_line(&mut backend, "list students in course cs999")
        .await
        .unwrap();
    assert!(result.output.contains("No records found."));
    assert!(!result.output.contains("ID"));
}

#[tokio::test]
async fn test_history_listing_is_newest_first() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    c.execute_line(&mut backend, "list students").await.unwrap();
    c.execute_line(&mut backend, "list courses").await.unwrap();

    let listing = c.execute_line(&mut backend, "history").await.unwrap();
    let first = listing.output.lines().next().unwrap();
    assert!(first.starts_with("[1]"));
    assert!(first.contains("list courses"));
    assert!(listing.output.contains("list students"));
    // the listing itself is not a history entry
    assert_eq!(c.history().len(), 2);
}

#[tokio::test]
async fn test_listen_with_null_engine_warns_and_continues() {
    let mut backend = ScriptedBackend::repeating_students();
    let mut c = console();

    let result = c.execute_line(&mut backend, "listen").await.unwrap();
    assert!(!result.success);
    assert!(result.output.contains("No speech engine"));
    assert!(backend.calls.is_empty());

    // typed fallback still works
    let typed = c.execute_line(&mut backend, "list students").await.unwrap();
    assert!(typed.success);
}

/// Engine that replays a fixed utterance.
struct OneShotEngine {
    events: VecDeque<SpeechEvent>,
}

#[async_trait]
impl SpeechEngine for OneShotEngine {
    fn is_available(&self) -> bool {
        true
    }

    async fn next_event(&mut self) -> Option<SpeechEvent> {
        self.events.pop_front()
    }
}

#[tokio::test]
async fn test_listen_submits_transcript() {
    let mut backend = ScriptedBackend::repeating_students();
    let engine = OneShotEngine {
        events: vec![
            SpeechEvent::Partial("list".into()),
            SpeechEvent::Final("list students".into()),
        ]
        .into(),
    };
    let mut c = Console::new(Box::new(engine));

    let result = c.execute_line(&mut backend, "listen").await.unwrap();
    assert!(result.success);
    assert!(result.output.contains("Heard: list students"));
    assert_eq!(backend.calls, vec!["list students"]);
    assert_eq!(c.history().len(), 1);
}

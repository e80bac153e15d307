//! Speech capture: a pluggable engine behind a trait, and a small
//! idle/listening state machine that retains the transcript.
//!
//! Capture is single-utterance: a final transcript (or the engine ending)
//! closes the session, and only one session may listen at a time.

use crate::error::SpeechError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// Interim transcript; may be replaced by later events.
    Partial(String),
    /// Final transcript for the utterance.
    Final(String),
    Error(SpeechError),
    /// Engine finished without a final transcript.
    End,
}

#[async_trait]
pub trait SpeechEngine: Send {
    /// Whether a capture engine is actually present on this build/host.
    fn is_available(&self) -> bool;

    /// Next event of the active utterance. `None` once the engine is done.
    async fn next_event(&mut self) -> Option<SpeechEvent>;
}

/// Placeholder engine for builds without a platform capture stack. `start`
/// against it fails with `Unsupported`, and the caller falls back to typed
/// input.
pub struct NullEngine;

#[async_trait]
impl SpeechEngine for NullEngine {
    fn is_available(&self) -> bool {
        false
    }

    async fn next_event(&mut self) -> Option<SpeechEvent> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Listening,
}

#[derive(Debug, Default)]
pub struct SpeechSession {
    state: SessionState,
    partial: Option<String>,
    final_text: Option<String>,
}

impl SpeechSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Begin listening. Rejects a second start while listening
    /// (`AlreadyListening`) and engines that are not present (`Unsupported`);
    /// both are warnings, not fatal.
    pub fn start(&mut self, engine_available: bool) -> Result<(), SpeechError> {
        if self.state == SessionState::Listening {
            return Err(SpeechError::AlreadyListening);
        }
        if !engine_available {
            return Err(SpeechError::Unsupported);
        }
        self.partial = None;
        self.final_text = None;
        self.state = SessionState::Listening;
        Ok(())
    }

    /// Feed one engine event. Returns the error to surface as a warning, if
    /// the event carried one.
    pub fn on_event(&mut self, event: &SpeechEvent) -> Option<SpeechError> {
        match event {
            SpeechEvent::Partial(text) => {
                self.partial = Some(text.clone());
                None
            }
            SpeechEvent::Final(text) => {
                self.final_text = Some(text.clone());
                None
            }
            SpeechEvent::Error(err) => Some(err.clone()),
            SpeechEvent::End => None,
        }
    }

    /// Idempotent from any state. Returns the retained transcript: the final
    /// one, or the last partial if the session was stopped early.
    pub fn stop(&mut self) -> Option<String> {
        self.state = SessionState::Idle;
        self.final_text.take().or_else(|| self.partial.take())
    }
}

/// Drive one utterance against the engine, returning the transcript if any.
pub async fn capture_utterance<E>(
    engine: &mut E,
    session: &mut SpeechSession,
) -> Result<Option<String>, SpeechError>
where
    E: SpeechEngine + ?Sized,
{
    session.start(engine.is_available())?;
    while let Some(event) = engine.next_event().await {
        if matches!(event, SpeechEvent::End) {
            break;
        }
        if let Some(warning) = session.on_event(&event) {
            tracing::warn!(%warning, "speech capture aborted");
            session.stop();
            return Err(warning);
        }
        if matches!(event, SpeechEvent::Final(_)) {
            break;
        }
    }
    Ok(session.stop())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedEngine {
        events: VecDeque<SpeechEvent>,
    }

    impl ScriptedEngine {
        fn new(events: Vec<SpeechEvent>) -> Self {
            Self {
                events: events.into(),
            }
        }
    }

    #[async_trait]
    impl SpeechEngine for ScriptedEngine {
        fn is_available(&self) -> bool {
            true
        }

        async fn next_event(&mut self) -> Option<SpeechEvent> {
            self.events.pop_front()
        }
    }

    #[tokio::test]
    async fn test_final_transcript_wins() {
        let mut engine = ScriptedEngine::new(vec![
            SpeechEvent::Partial("list".into()),
            SpeechEvent::Partial("list stu".into()),
            SpeechEvent::Final("list students".into()),
        ]);
        let mut session = SpeechSession::new();

        let transcript = capture_utterance(&mut engine, &mut session).await.unwrap();
        assert_eq!(transcript.as_deref(), Some("list students"));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_last_partial_retained_on_end() {
        let mut engine = ScriptedEngine::new(vec![
            SpeechEvent::Partial("list co".into()),
            SpeechEvent::Partial("list courses".into()),
            SpeechEvent::End,
        ]);
        let mut session = SpeechSession::new();

        let transcript = capture_utterance(&mut engine, &mut session).await.unwrap();
        assert_eq!(transcript.as_deref(), Some("list courses"));
    }

    #[tokio::test]
    async fn test_unavailable_engine_is_unsupported() {
        let mut engine = NullEngine;
        let mut session = SpeechSession::new();

        let err = capture_utterance(&mut engine, &mut session)
            .await
            .unwrap_err();
        assert_eq!(err, SpeechError::Unsupported);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_engine_error_surfaces_as_warning() {
        let mut engine = ScriptedEngine::new(vec![
            SpeechEvent::Partial("li".into()),
            SpeechEvent::Error(SpeechError::PermissionDenied),
        ]);
        let mut session = SpeechSession::new();

        let err = capture_utterance(&mut engine, &mut session)
            .await
            .unwrap_err();
        assert_eq!(err, SpeechError::PermissionDenied);
        // session recovered, next capture can start
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_second_start_rejected_while_listening() {
        let mut session = SpeechSession::new();
        session.start(true).unwrap();
        assert_eq!(session.start(true), Err(SpeechError::AlreadyListening));
        // still listening; original session unaffected
        assert_eq!(session.state(), SessionState::Listening);
    }

    #[test]
    fn test_stop_is_idempotent_when_idle() {
        let mut session = SpeechSession::new();
        assert_eq!(session.stop(), None);
        assert_eq!(session.stop(), None);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_no_speech_yields_no_transcript() {
        let mut engine = ScriptedEngine::new(vec![SpeechEvent::End]);
        let mut session = SpeechSession::new();

        let transcript = capture_utterance(&mut engine, &mut session).await.unwrap();
        assert_eq!(transcript, None);
    }
}

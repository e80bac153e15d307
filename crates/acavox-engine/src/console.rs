//! Console executor: owns the request lifecycle for submitted commands and
//! the built-ins around them.
//!
//! Pipeline for free text: pending history entry → dispatch → settle with
//! exactly one of response/failure → render. Built-ins (`history`, `run`,
//! `view`, `listen`, `help`) never touch the network except `run`, which
//! re-submits as a brand new entry.

use crate::backend::CommandBackend;
use crate::error::DispatchError;
use crate::history::{HISTORY_CAPACITY, History, Outcome};
use crate::speech::{SpeechEngine, SpeechSession, capture_utterance};
use acavox_common::formatter::format_response;
use acavox_common::intent::matcher::EXAMPLE_COMMANDS;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Result of executing a line.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Formatted output for display. May be empty for defensive no-ops.
    pub output: String,
    /// Whether execution was successful.
    pub success: bool,
}

impl ExecutionResult {
    fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    fn warn(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }
}

/// "Current response" tracker. Settles are tagged with their request
/// sequence; anything older than the newest displayed response is discarded
/// instead of racing it.
#[derive(Debug, Default)]
struct LatestView {
    seq: u64,
}

impl LatestView {
    fn offer(&mut self, seq: u64) -> bool {
        if seq < self.seq {
            return false;
        }
        self.seq = seq;
        true
    }
}

pub struct Console {
    history: History,
    session: SpeechSession,
    view: LatestView,
    engine: Box<dyn SpeechEngine>,
    next_seq: u64,
}

impl Console {
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            history: History::new(),
            session: SpeechSession::new(),
            view: LatestView::default(),
            engine,
            next_seq: 1,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Execute one line of input: a built-in command or free text for the
    /// backend.
    pub async fn execute_line<B: CommandBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        line: &str,
    ) -> Result<ExecutionResult, ConsoleError> {
        let trimmed = line.trim();
        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("help") => Ok(ExecutionResult::ok(help_text())),
            Some("history") => Ok(ExecutionResult::ok(self.render_history())),
            Some("run") => match parse_index(words.next()) {
                Some(n) => {
                    let text = match self.history.nth_newest(n) {
                        Some(entry) => entry.text.clone(),
                        None => return Ok(ExecutionResult::warn("No such history entry.")),
                    };
                    self.submit(backend, &text).await
                }
                None => Ok(ExecutionResult::warn("Usage: run N (see 'history')")),
            },
            Some("view") => match parse_index(words.next()) {
                Some(n) => Ok(self.view_entry(n)),
                None => Ok(ExecutionResult::warn("Usage: view N (see 'history')")),
            },
            Some("listen") => self.listen(backend).await,
            Some(_) => self.submit(backend, trimmed).await,
            None => Err(ConsoleError::Dispatch(DispatchError::EmptyCommand)),
        }
    }

    /// Submit free text to the backend. Exactly one history entry per call;
    /// empty input is rejected before the entry is created.
    pub async fn submit<B: CommandBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        text: &str,
    ) -> Result<ExecutionResult, ConsoleError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ConsoleError::Dispatch(DispatchError::EmptyCommand));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.history.begin(seq, trimmed);

        match backend.submit(trimmed).await {
            Ok(response) => {
                let output = format_response(&response);
                self.history.settle(seq, Outcome::Response(response));
                if self.view.offer(seq) {
                    Ok(ExecutionResult::ok(output))
                } else {
                    tracing::debug!(seq, "discarding stale response");
                    Ok(ExecutionResult::ok(""))
                }
            }
            Err(err) => {
                self.history.settle(seq, Outcome::Failure(err.to_string()));
                Err(ConsoleError::Dispatch(err))
            }
        }
    }

    /// Re-display a stored outcome without any network call. A pending entry
    /// is a defensive no-op, not an error.
    fn view_entry(&self, n: usize) -> ExecutionResult {
        match self.history.nth_newest(n) {
            Some(entry) => match &entry.outcome {
                Some(Outcome::Response(response)) => {
                    ExecutionResult::ok(format_response(response))
                }
                Some(Outcome::Failure(message)) => {
                    ExecutionResult::ok(format!("(failed) {message}"))
                }
                None => ExecutionResult::ok(""),
            },
            None => ExecutionResult::warn("No such history entry."),
        }
    }

    /// Capture one spoken command and submit its transcript. Speech failures
    /// are warnings; the caller types instead.
    async fn listen<B: CommandBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<ExecutionResult, ConsoleError> {
        match capture_utterance(self.engine.as_mut(), &mut self.session).await {
            Ok(Some(transcript)) => {
                let result = self.submit(backend, &transcript).await?;
                Ok(ExecutionResult {
                    output: format!("Heard: {transcript}\n{}", result.output),
                    success: result.success,
                })
            }
            Ok(None) => Ok(ExecutionResult::warn("No speech captured.")),
            Err(err) => Ok(ExecutionResult::warn(format!("Warning: {err}"))),
        }
    }

    fn render_history(&self) -> String {
        if self.history.is_empty() {
            return "History is empty.".to_string();
        }
        let mut output = String::new();
        for (i, entry) in self.history.iter().enumerate() {
            let status = match &entry.outcome {
                None => "pending",
                Some(Outcome::Response(_)) => "ok",
                Some(Outcome::Failure(_)) => "failed",
            };
            output.push_str(&format!(
                "[{}] {} ({}) {}\n",
                i + 1,
                entry.submitted_at.format("%H:%M:%S"),
                status,
                entry.text
            ));
        }
        output.push_str("Use 'run N' to re-run or 'view N' to re-display.");
        output
    }
}

/// Map a 1-based display index onto a 0-based history offset.
fn parse_index(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .map(|n| n - 1)
}

fn help_text() -> String {
    let mut output = String::from(
        "Commands:\n  history        show the last commands (up to ",
    );
    output.push_str(&HISTORY_CAPACITY.to_string());
    output.push_str(
        ")\n  run N          re-run history entry N (creates a new entry)\n  \
         view N         re-display a stored response (no network call)\n  \
         listen         capture one spoken command\n  \
         exit | quit    close the console\n\
         Anything else is sent to the backend, e.g.:",
    );
    for example in EXAMPLE_COMMANDS {
        output.push_str(&format!("\n  {example}"));
    }
    output
}

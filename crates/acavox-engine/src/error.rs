use thiserror::Error;

/// Failure taxonomy for one submitted command. Display strings double as the
/// user-facing messages; none of these crash the console.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Empty command. Type a command first.")]
    EmptyCommand,

    #[error("Not authenticated. Please log in and configure an API token.")]
    Unauthenticated,

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Could not reach the backend. Is the server running?")]
    Unreachable,

    #[error("Client error: {0}")]
    ClientError(String),
}

/// Speech capture failures. All of these surface as warnings; the caller
/// falls back to typed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("No speech engine is available. Type your command instead.")]
    Unsupported,

    #[error("A listening session is already active.")]
    AlreadyListening,

    #[error("Microphone permission was denied.")]
    PermissionDenied,

    #[error("No speech was detected.")]
    NoSpeech,

    #[error("Speech engine error: {0}")]
    Engine(String),
}

use crate::error::DispatchError;
use acavox_common::protocol::CommandResponse;
use async_trait::async_trait;

/// The seam between the console and whatever interprets commands.
///
/// The production implementation is [`crate::http::HttpBackend`]; tests
/// substitute scripted backends.
#[async_trait]
pub trait CommandBackend: Send {
    /// Submit one command and wait for its structured result.
    ///
    /// An `unknown` intent in the response is a valid terminal outcome, not
    /// an error; errors are reserved for transport and protocol failures.
    async fn submit(&mut self, text: &str) -> Result<CommandResponse, DispatchError>;
}

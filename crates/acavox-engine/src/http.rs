use crate::backend::CommandBackend;
use crate::error::DispatchError;
use acavox_common::protocol::{CommandRequest, CommandResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// HTTP implementation of [`CommandBackend`].
///
/// One logical operation, one endpoint: `POST {api_url}/voice/command`.
/// Authentication travels as an optional bearer token.
#[derive(Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(
        api_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let endpoint = format!("{}/voice/command", api_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| DispatchError::ClientError(format!("invalid api url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::ClientError(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// 401 is an authentication problem; every other non-2xx status is a server
/// error carrying whatever body came back.
fn classify_status(status: u16, body: String) -> DispatchError {
    if status == StatusCode::UNAUTHORIZED.as_u16() {
        DispatchError::Unauthenticated
    } else {
        DispatchError::ServerError { status, body }
    }
}

/// No response at all (refused connection, timeout) is `Unreachable`;
/// anything else on the client side is `ClientError`.
fn classify_transport(err: reqwest::Error) -> DispatchError {
    if err.is_connect() || err.is_timeout() {
        DispatchError::Unreachable
    } else {
        DispatchError::ClientError(err.to_string())
    }
}

#[async_trait]
impl CommandBackend for HttpBackend {
    async fn submit(&mut self, text: &str) -> Result<CommandResponse, DispatchError> {
        tracing::debug!(endpoint = %self.endpoint, "submitting command");

        let mut request = self.client.post(self.endpoint.clone()).json(&CommandRequest {
            text: text.to_string(),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "backend rejected command");
            return Err(classify_status(status.as_u16(), body));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DispatchError::ClientError(format!("response was not JSON: {e}")))?;
        serde_json::from_value(value)
            .map_err(|e| DispatchError::ClientError(format!("malformed response: {e}")))
    }
}

//! HTTP client for the voice assistant backend
//!
//! A worker task owns the client, consumes queries from the machine's
//! dispatch channel, and feeds the decoded result back in as a
//! `BackendResponded` event. One query is in flight at a time; the
//! request timeout keeps a hung backend from pinning the machine in its
//! processing phase.

use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::api::{AssistantReply, QueryBody, RawReply};
use super::machine::AssistantEvent;

/// Failures talking to or decoding from the backend.
///
/// All variants surface to the user as the same generic error string.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, timeout, or non-success HTTP status
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape
    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for `POST <endpoint>` with `{"query": ...}` bodies
pub struct BackendClient {
    http: reqwest::Client,
    endpoint: String,
}

impl BackendClient {
    /// Build a client with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Send one transcript and decode the reply
    pub async fn ask(&self, query: &str) -> std::result::Result<AssistantReply, BackendError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&QueryBody {
                query: query.to_string(),
            })
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let raw: RawReply = serde_json::from_slice(&body)?;
        Ok(raw.into_reply())
    }

    /// Run the worker: one query in, one `BackendResponded` out
    pub async fn run(
        self,
        mut query_rx: mpsc::Receiver<String>,
        event_tx: mpsc::Sender<AssistantEvent>,
    ) {
        info!(endpoint = %self.endpoint, "backend worker started");

        while let Some(query) = query_rx.recv().await {
            debug!(%query, "sending query");
            let result = self.ask(&query).await;

            if let Err(e) = &result {
                warn!(%e, "backend query failed");
            }

            if event_tx
                .send(AssistantEvent::BackendResponded(result))
                .await
                .is_err()
            {
                break;
            }
        }

        info!("backend worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = BackendClient::new(
            "http://127.0.0.1:8000/api/voice-assistant/",
            Duration::from_secs(10),
        )
        .unwrap();
        assert!(client.endpoint.ends_with("/voice-assistant/"));
    }

    #[test]
    fn test_decode_error_maps_to_backend_error() {
        let err = serde_json::from_slice::<RawReply>(b"not json").unwrap_err();
        let backend_err = BackendError::from(err);
        assert!(backend_err.to_string().starts_with("malformed reply"));
    }
}

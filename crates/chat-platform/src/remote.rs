//! HTTP reply backend.
//!
//! Protocol: `POST <url>` with `{"message": "<user text>"}` and a JSON
//! response `{"reply": "<text>"}`. Uses browser `fetch()` via gloo-net.
//! Any failure (timeout, non-2xx, malformed body, empty reply) is an error
//! and the caller keeps its local answer.

use async_trait::async_trait;
use futures::future::{self, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};

use chat_core::ports::ReplyBackendPort;
use chat_types::{ChatError, Result, config::BackendConfig};

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    reply: String,
}

pub struct HttpReplyBackend {
    config: BackendConfig,
}

impl HttpReplyBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let url = config.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/')) {
            return Err(ChatError::Config(format!("Invalid backend URL: {:?}", config.url)));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn post(&self, message: &str) -> Result<String> {
        let response = Request::post(self.config.url.trim())
            .header("Content-Type", "application/json")
            .json(&AskRequest { message })
            .map_err(|e| ChatError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ChatError::Network(format!(
                "HTTP {} {}",
                response.status(),
                response.status_text()
            )));
        }

        let data: AskResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Serialization(e.to_string()))?;

        let reply = data.reply.trim();
        if reply.is_empty() {
            return Err(ChatError::Network("Backend returned an empty reply".to_string()));
        }
        Ok(reply.to_string())
    }
}

#[async_trait(?Send)]
impl ReplyBackendPort for HttpReplyBackend {
    async fn ask(&self, message: &str) -> Result<String> {
        let timeout_ms = self.config.timeout_ms;
        let request = Box::pin(self.post(message));
        let timeout = Box::pin(TimeoutFuture::new(timeout_ms));

        match future::select(request, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                log::warn!("Backend {} timed out after {} ms", self.config.url, timeout_ms);
                Err(ChatError::Network(format!("Timed out after {} ms", timeout_ms)))
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.config.url
    }
}

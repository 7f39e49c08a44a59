use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use msme_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

/// Client for the external LLM agent runtime (OpenAI-compatible chat
/// completions). Availability is decided once at startup from the
/// credential and re-checked lazily: any call failure flips the client
/// into fallback for the rest of the run unless a later `probe` clears
/// it.
pub struct AgentRuntime {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    degraded: AtomicBool,
}

impl AgentRuntime {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: "gpt-4o-mini".to_string(),
            degraded: AtomicBool::new(false),
        })
    }

    pub fn configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn available(&self) -> bool {
        self.configured() && !self.degraded.load(Ordering::Relaxed)
    }

    /// Health check against the runtime's model listing. A success
    /// clears a previous degradation so later calls may retry.
    pub async fn probe(&self) -> bool {
        let Some(api_key) = self.api_key.as_deref() else {
            return false;
        };
        let url = format!("{}/models", self.base_url);
        match self.client.get(&url).bearer_auth(api_key).send().await {
            Ok(response) if response.status().is_success() => {
                if self.degraded.swap(false, Ordering::Relaxed) {
                    info!("agent runtime recovered, leaving fallback mode");
                }
                true
            }
            Ok(response) => {
                warn!(status = %response.status(), "agent runtime probe failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "agent runtime probe failed");
                false
            }
        }
    }

    /// One chat completion. Errors mark the runtime degraded; the caller
    /// substitutes the role's fallback.
    pub async fn complete(&self, instructions: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let result = async {
            let response = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(api_key)
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Error::Agent(format!(
                    "agent runtime returned {}",
                    response.status()
                )));
            }

            let body: ChatResponse = response.json().await?;
            body.choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| Error::Agent("empty completion".to_string()))
        }
        .await;

        if result.is_err() {
            self.degraded.store(true, Ordering::Relaxed);
            warn!("agent runtime call failed, entering fallback mode");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP endpoint answering every request with 200 and an
    /// empty JSON object.
    async fn spawn_stub() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    let body = "{}";
                    let response = format!(
                        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn unconfigured_runtime_is_unavailable() {
        let runtime =
            AgentRuntime::new("https://api.openai.com/v1", None, Duration::from_secs(5)).unwrap();
        assert!(!runtime.configured());
        assert!(!runtime.available());
        assert!(!runtime.probe().await);

        let err = runtime.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn unreachable_runtime_flips_to_fallback_and_stays_there() {
        // Bind then drop the listener so the port refuses connections.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let runtime = AgentRuntime::new(
            &base_url,
            Some("test-key".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();
        assert!(runtime.available());

        assert!(runtime.complete("sys", "hello").await.is_err());
        assert!(!runtime.available());

        // A failed health check must not clear the degradation.
        assert!(!runtime.probe().await);
        assert!(!runtime.available());
    }

    #[tokio::test]
    async fn successful_health_check_clears_degradation() {
        // The stub answers 200 with a body that is not a valid chat
        // completion, so complete() fails but the health check passes.
        let base_url = spawn_stub().await;
        let runtime = AgentRuntime::new(
            &base_url,
            Some("test-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(runtime.complete("sys", "hello").await.is_err());
        assert!(!runtime.available());

        assert!(runtime.probe().await);
        assert!(runtime.available());
    }
}

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error};

use crate::error::InferenceError;
use crate::metrics::{INFERENCE_FAILURES, INFERENCE_LATENCY};

// cap on backend error text passed back to clients
const MAX_ERROR_BODY_CHARS: usize = 200;

// Ollama chat request format
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

// Ollama chat response format (only the part we read)
#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub message: ChatMessage,
}

pub fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize the following text clearly and concisely. The summary should be 2-3 lines:\n\n{text}"
    )
}

/// Client for an Ollama-compatible `/api/chat` endpoint.
///
/// One attempt per call, bounded by the timeout given at construction.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(InferenceError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        })
    }

    pub async fn summarize(&self, text: &str) -> Result<String, InferenceError> {
        let start_time = Instant::now();
        let result = self.chat(&summary_prompt(text)).await;
        INFERENCE_LATENCY.observe(start_time.elapsed().as_secs_f64());

        if let Err(e) = &result {
            INFERENCE_FAILURES.inc();
            error!(backend = %self.base_url, model = %self.model, "inference failed: {e}");
        }
        result
    }

    async fn chat(&self, prompt: &str) -> Result<String, InferenceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let mut req = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req.send().await.map_err(InferenceError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body: truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        let parsed = res
            .json::<ChatResponse>()
            .await
            .map_err(InferenceError::Decode)?;

        let summary = parsed.message.content.trim();
        if summary.is_empty() {
            return Err(InferenceError::Empty);
        }
        debug!(chars = summary.chars().count(), "received summary");
        Ok(summary.to_string())
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

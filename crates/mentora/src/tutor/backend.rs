//! Tutor provider backends.
//!
//! The provider is a black box speaking an OpenAI-compatible chat-completions
//! API. Everything behind the trait is swappable; tests install a scripted
//! backend.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Tutor provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Base URL of the chat-completions API (without the endpoint path).
    pub base_url: String,
    /// Model identifier passed through to the provider.
    pub model: String,
    /// Optional bearer key for hosted providers.
    pub api_key: Option<String>,
    /// System prompt prepended to every conversation.
    pub system_prompt: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Maximum number of prior messages sent as context.
    pub max_history_messages: usize,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
            system_prompt: "You are a patient tutor on an education platform. \
                            Explain concepts step by step and encourage the student."
                .to_string(),
            timeout_seconds: 60,
            max_history_messages: 40,
        }
    }
}

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAuthor {
    Student,
    Tutor,
}

/// One turn of conversation history handed to the provider.
#[derive(Debug, Clone)]
pub struct TutorTurn {
    pub author: TurnAuthor,
    pub body: String,
}

/// A tutor backend produces a reply given the conversation so far.
#[async_trait]
pub trait TutorBackend: Send + Sync {
    /// Generate the tutor's reply to the latest student message.
    async fn reply(&self, history: &[TutorTurn]) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// HTTP backend for OpenAI-compatible providers (Ollama, vLLM, hosted APIs).
#[derive(Debug, Clone)]
pub struct HttpTutorBackend {
    client: reqwest::Client,
    config: TutorConfig,
}

impl HttpTutorBackend {
    /// Build a backend with its own connection pool and timeout.
    pub fn new(config: TutorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("building tutor HTTP client")?;

        Ok(Self { client, config })
    }

    fn build_messages(&self, history: &[TutorTurn]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: self.config.system_prompt.clone(),
        });

        let start = history
            .len()
            .saturating_sub(self.config.max_history_messages);
        for turn in &history[start..] {
            messages.push(ChatMessage {
                role: match turn.author {
                    TurnAuthor::Student => "user".to_string(),
                    TurnAuthor::Tutor => "assistant".to_string(),
                },
                content: turn.body.clone(),
            });
        }

        messages
    }
}

#[async_trait]
impl TutorBackend for HttpTutorBackend {
    async fn reply(&self, history: &[TutorTurn]) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: self.build_messages(history),
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("tutor provider request to {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("tutor provider returned {status}: {body}");
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("decoding tutor provider response")?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if reply.is_empty() {
            bail!("tutor provider returned an empty completion");
        }

        Ok(reply)
    }
}

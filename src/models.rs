use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::session::Turn;
use crate::settings::ModelParams;

const SYSTEM_PROMPT: &str = "You are a helpful HR assistant. Help employees with HR policies, \
benefits, procedures, employee information, leave balances, interview questions, and company \
policies. Be friendly, professional, and helpful.";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation timed out")]
    Timeout,
    #[error("provider returned {status}")]
    Provider { status: u16 },
    #[error("provider request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("provider returned no completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Transport(e)
        }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Produces assistant text for `message` given the session's prior turns.
    async fn generate(&self, context: &[Turn], message: &str) -> Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct OpenAICompatible {
    base_url: String,
    api_key: Option<String>,
    model: String,
    params: ModelParams,
    client: reqwest::Client,
}

impl OpenAICompatible {
    pub fn from_env(model: String, params: ModelParams, timeout: Duration) -> anyhow::Result<Self> {
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let api_key = std::env::var("OPENAI_API_KEY").ok();
        if api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; generation requests will be unauthenticated");
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            api_key,
            model,
            params,
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct OaiChatRequest<'a> {
    model: &'a str,
    messages: Vec<OaiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OaiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OaiChatResponse {
    choices: Vec<OaiChoice>,
}

#[derive(Debug, Deserialize)]
struct OaiChoice {
    message: OaiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OaiResponseMessage {
    content: String,
}

fn build_messages<'a>(context: &'a [Turn], message: &'a str) -> Vec<OaiMessage<'a>> {
    let mut messages = Vec::with_capacity(context.len() + 2);
    messages.push(OaiMessage {
        role: "system",
        content: SYSTEM_PROMPT,
    });
    for turn in context {
        messages.push(OaiMessage {
            role: turn.role.as_str(),
            content: &turn.text,
        });
    }
    messages.push(OaiMessage {
        role: "user",
        content: message,
    });
    messages
}

#[async_trait]
impl LanguageModel for OpenAICompatible {
    async fn generate(&self, context: &[Turn], message: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = OaiChatRequest {
            model: &self.model,
            messages: build_messages(context, message),
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
            top_p: self.params.top_p,
        };
        let mut rb = self.client.post(url).json(&body);
        if let Some(key) = &self.api_key {
            rb = rb.bearer_auth(key);
        }
        let resp = rb.send().await?;
        if !resp.status().is_success() {
            return Err(GenerationError::Provider {
                status: resp.status().as_u16(),
            });
        }
        let v: OaiChatResponse = resp.json().await?;
        let content = v
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GenerationError::EmptyCompletion)?;
        Ok(content)
    }
}

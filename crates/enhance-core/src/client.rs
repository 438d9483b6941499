use crate::error::EnhanceError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub const SYSTEM_PROMPT: &str = "You are an expert at improving prompts for AI coding assistants. \
Your task is to enhance prompts to be more specific, clear, and effective. \
Include technical context and expected output format where relevant. \
IMPORTANT: Provide ONLY the enhanced prompt text without any introductions, \
explanations, or conclusions. Do not start with phrases like 'Here's an enhanced prompt:' \
or end with explanations of what you did. Just return the enhanced prompt text directly.";

const FALLBACK_RESPONSE: &str = "Could not enhance the prompt";

#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, EnhanceError>;
}

/// Chat-completion client for the Groq OpenAI-compatible endpoint.
pub struct GroqClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EnhanceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EnhanceError::Upstream(e.into()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl Completion for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, EnhanceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Please enhance this prompt for better AI understanding and response: \"{prompt}\""
                    ),
                },
            ],
            "temperature": 0.7,
            "max_tokens": 1024,
        });

        debug!(model = %self.model, url = %url, "sending chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EnhanceError::Upstream(anyhow::Error::new(e).context("send request")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EnhanceError::Upstream(anyhow::anyhow!(
                "chat completion returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnhanceError::Upstream(anyhow::Error::new(e).context("parse response")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| FALLBACK_RESPONSE.to_string());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_content() {
        let raw = r#"{
            "choices": [
                { "message": { "role": "assistant", "content": "Enhanced text" } },
                { "message": { "role": "assistant", "content": "second" } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("Enhanced text"));
    }

    #[test]
    fn missing_choices_tolerated() {
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn null_content_tolerated() {
        let raw = r#"{ "choices": [ { "message": { "content": null } } ] }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}

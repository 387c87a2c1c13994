use super::{Explainer, build_prompt};
use crate::config::ExplainerConfig;
use crate::error::ExplainError;
use crate::indexer::SourceLanguage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Explainer backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiExplainer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    // Overrides the language of the indexed files
    language: Option<String>,
    max_tokens: Option<u32>,
    timeout_secs: u64,
}

impl fmt::Debug for OpenAiExplainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiExplainer")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl OpenAiExplainer {
    /// Build an explainer from configuration. Fails if no API key is set.
    pub fn new(config: &ExplainerConfig) -> Result<Self, ExplainError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ExplainError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("funcsearch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            language: config
                .language
                .clone()
                .filter(|language| !language.trim().is_empty()),
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn transport_error(&self, err: reqwest::Error) -> ExplainError {
        if err.is_timeout() {
            ExplainError::Timeout(self.timeout_secs)
        } else {
            ExplainError::Http(err)
        }
    }
}

#[async_trait::async_trait]
impl Explainer for OpenAiExplainer {
    async fn explain(
        &self,
        func_text: &str,
        language: SourceLanguage,
    ) -> Result<String, ExplainError> {
        let language = self
            .language
            .as_deref()
            .unwrap_or_else(|| language.prompt_name());
        let prompt = build_prompt(language, func_text);
        let messages = [ChatMessage {
            role: "user",
            content: &prompt,
        }];
        let body = ChatRequest {
            model: &self.model,
            messages: &messages,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            "Requesting explanation from {} ({} prompt bytes)",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::error!("Chat completion error {}: {}", status, text);
            return Err(ExplainError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ExplainError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ExplainError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage<'a>],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

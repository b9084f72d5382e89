//! OpenAI Chat Completions adapter, the alternate provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, prompts, GenerativeBackend, LlmError};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The model used for all OpenAI calls. A configuration constant, not
/// user-selectable at runtime.
pub const MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

pub struct OpenAiBackend {
    client: Client,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: http_client(),
            api_key,
        }
    }

    /// One request, one text completion. No retries.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let text = first_choice_text(parsed).ok_or(LlmError::EmptyContent)?;

        debug!(model = MODEL, chars = text.len(), "OpenAI call succeeded");
        Ok(text)
    }
}

fn first_choice_text(response: ChatCompletionResponse) -> Option<String> {
    let choice = response.choices.into_iter().next()?;
    if choice.message.content.is_empty() {
        None
    } else {
        Some(choice.message.content)
    }
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    async fn analyze_fit(&self, cv_text: &str, jd_text: &str) -> Result<String, LlmError> {
        self.generate(&prompts::fit_prompt(cv_text, jd_text)).await
    }

    async fn generate_questions(&self, jd_text: &str, role: &str) -> Result<String, LlmError> {
        self.generate(&prompts::questions_prompt(jd_text, role))
            .await
    }

    fn model(&self) -> &'static str {
        MODEL
    }
}

//! Google Generative Language adapter, the tracker's default provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{http_client, prompts, GenerativeBackend, LlmError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The model used for all Gemini calls. A configuration constant, not
/// user-selectable at runtime.
pub const MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

pub struct GeminiBackend {
    client: Client,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            client: http_client(),
            api_key,
        }
    }

    /// One request, one text completion. No retries.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the provider's message when the error body parses
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = first_candidate_text(&parsed).ok_or(LlmError::EmptyContent)?;

        debug!(model = MODEL, chars = text.len(), "Gemini call succeeded");
        Ok(text)
    }
}

/// Concatenates the text parts of the first candidate.
fn first_candidate_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_wire_shape() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn first_candidate_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "Strengths: "}, {"text": "Rust."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            first_candidate_text(&response).as_deref(),
            Some("Strengths: Rust.")
        );
    }

    #[test]
    fn response_without_candidates_is_empty_content() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(first_candidate_text(&response).is_none());
    }

    #[test]
    fn error_body_parses_provider_message() {
        let parsed: GeminiError = serde_json::from_str(
            r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.error.message, "API key not valid");
    }
}

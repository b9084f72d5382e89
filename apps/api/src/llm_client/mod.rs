//! Generative backend clients.
//!
//! All LLM traffic goes through the `GenerativeBackend` trait; handlers
//! never talk to a provider directly. The concrete adapter is chosen once
//! at startup from `LLM_BACKEND`, so swapping providers changes no caller
//! code.

pub mod gemini;
pub mod openai;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::config::{BackendKind, Config};

/// Timeout applied to every outbound generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend returned empty content")]
    EmptyContent,
}

/// The capability surface both providers implement.
///
/// Responses are returned verbatim: no parsing of the "score out of 10"
/// format; downstream consumers treat the text as opaque display content.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Free-text assessment of how well a CV matches a job description.
    async fn analyze_fit(&self, cv_text: &str, jd_text: &str) -> Result<String, LlmError>;

    /// Five role-specific interview questions with suggested answers.
    async fn generate_questions(&self, jd_text: &str, role: &str) -> Result<String, LlmError>;

    /// Model identifier, for startup logging.
    fn model(&self) -> &'static str;
}

/// Builds the configured backend adapter, or `None` when the credential is
/// absent. The submit pipeline turns `None` into a blocking error before
/// anything else runs.
pub fn backend_from_config(config: &Config) -> Option<Arc<dyn GenerativeBackend>> {
    let api_key = config.api_key.clone()?;
    let backend: Arc<dyn GenerativeBackend> = match config.backend {
        BackendKind::Gemini => Arc::new(gemini::GeminiBackend::new(api_key)),
        BackendKind::OpenAi => Arc::new(openai::OpenAiBackend::new(api_key)),
    };
    Some(backend)
}

fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(backend: BackendKind, api_key: Option<&str>) -> Config {
        Config {
            backend,
            api_key: api_key.map(String::from),
            data_file: PathBuf::from("data/job_tracker.csv"),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn no_credential_means_no_backend() {
        assert!(backend_from_config(&config(BackendKind::Gemini, None)).is_none());
    }

    #[test]
    fn gemini_selected_by_config() {
        let backend = backend_from_config(&config(BackendKind::Gemini, Some("key"))).unwrap();
        assert_eq!(backend.model(), gemini::MODEL);
    }

    #[test]
    fn openai_selected_by_config() {
        let backend = backend_from_config(&config(BackendKind::OpenAi, Some("key"))).unwrap();
        assert_eq!(backend.model(), openai::MODEL);
    }
}

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Which generative backend the service talks to. Selected once at startup
/// via `LLM_BACKEND`; callers never pick a provider per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    OpenAi,
}

impl BackendKind {
    /// Name of the environment variable carrying this backend's credential.
    pub fn credential_var(self) -> &'static str {
        match self {
            BackendKind::Gemini => "GEMINI_API_KEY",
            BackendKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(BackendKind::Gemini),
            "openai" => Ok(BackendKind::OpenAi),
            other => Err(anyhow!(
                "Unknown LLM_BACKEND '{other}' (expected 'gemini' or 'openai')"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// The backend credential is deliberately optional: without it the service
/// still serves the tracker table and export, and the analyze action is
/// rejected with a visible error instead of attempting the call.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub api_key: Option<String>,
    pub data_file: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend: BackendKind = std::env::var("LLM_BACKEND")
            .unwrap_or_else(|_| "gemini".to_string())
            .parse()?;

        let api_key = std::env::var(backend.credential_var())
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Config {
            backend,
            api_key,
            data_file: std::env::var("TRACKER_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/job_tracker.csv")),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

//! Submit / list / export handlers: the interactive surface of the tracker.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::llm_client::GenerativeBackend;
use crate::models::application::{ApplicationRecord, ApplicationStatus};
use crate::state::AppState;
use crate::tracker::store::TrackerStore;

/// Filename offered for the CSV download.
const EXPORT_FILENAME: &str = "job_tracker.csv";

/// Parsed multipart form for one submission. Only the CV file and the job
/// description gate the submit action; everything else has a default.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub role: String,
    pub company: String,
    pub expected_salary: u64,
    pub date_applied: Option<NaiveDate>,
    pub status: Option<ApplicationStatus>,
    pub job_description: String,
    pub cv_filename: String,
    pub cv_data: Bytes,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub record: ApplicationRecord,
    pub fit_summary: String,
    /// Present only when the submitted status is "Interview".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_questions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<ApplicationRecord>,
    pub count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
///
/// Multipart form: `cv` (PDF/DOCX file), `job_description`, `role`,
/// `company`, `expected_salary`, `date_applied` (optional, YYYY-MM-DD),
/// `status`. Runs the full pipeline and appends the record to the tracker.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SubmitResponse>, AppError> {
    let form = read_submission_form(multipart).await?;
    let response = process_submission(state.llm.as_deref(), &state.store, form).await?;
    Ok(Json(response))
}

/// GET /api/v1/applications
///
/// The full historical table, oldest first.
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<ApplicationsResponse>, AppError> {
    let applications = state.store.load()?;
    let count = applications.len();
    Ok(Json(ApplicationsResponse {
        applications,
        count,
    }))
}

/// GET /api/v1/applications/export
///
/// The table as a CSV attachment, in the same format as the backing file.
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let applications = state.store.load()?;
    if applications.is_empty() {
        return Err(AppError::NotFound(
            "No applications recorded yet".to_string(),
        ));
    }

    let csv = TrackerStore::export_csv(&applications)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        csv,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// The submit pipeline, independent of the HTTP layer so the credential and
/// question-generation contracts stay testable with a backend double.
///
/// Order: credential gate → input gate → extract → analyze → (Interview
/// only) generate questions → append. Nothing touches the store until every
/// generation call has succeeded.
pub async fn process_submission(
    backend: Option<&dyn GenerativeBackend>,
    store: &TrackerStore,
    form: SubmissionForm,
) -> Result<SubmitResponse, AppError> {
    let Some(backend) = backend else {
        return Err(AppError::MissingCredential);
    };

    if form.cv_data.is_empty() || form.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Both a CV file and a job description are required".to_string(),
        ));
    }

    let cv_text = extract_text(&form.cv_data, &form.cv_filename)?;
    let fit_summary = backend
        .analyze_fit(&cv_text, &form.job_description)
        .await?;

    let status = form.status.unwrap_or(ApplicationStatus::Applied);
    let record = ApplicationRecord {
        role: form.role,
        company: form.company,
        date_applied: form
            .date_applied
            .unwrap_or_else(|| Local::now().date_naive()),
        expected_salary: form.expected_salary,
        status,
        fit_summary: fit_summary.clone(),
    };

    let interview_questions = if status == ApplicationStatus::Interview {
        Some(
            backend
                .generate_questions(&form.job_description, &record.role)
                .await?,
        )
    } else {
        None
    };

    store.append(std::slice::from_ref(&record))?;
    info!(
        role = %record.role,
        company = %record.company,
        status = %record.status,
        "Application analyzed and saved"
    );

    Ok(SubmitResponse {
        record,
        fit_summary,
        interview_questions,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_submission_form(mut multipart: Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "cv" => {
                form.cv_filename = field.file_name().unwrap_or_default().to_string();
                form.cv_data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read CV upload: {e}"))
                })?;
            }
            "job_description" => form.job_description = read_text(field, &name).await?,
            "role" => form.role = read_text(field, &name).await?,
            "company" => form.company = read_text(field, &name).await?,
            "expected_salary" => {
                let raw = read_text(field, &name).await?;
                if !raw.trim().is_empty() {
                    form.expected_salary = raw.trim().parse().map_err(|_| {
                        AppError::Validation(format!(
                            "expected_salary must be a non-negative integer, got '{raw}'"
                        ))
                    })?;
                }
            }
            "date_applied" => {
                let raw = read_text(field, &name).await?;
                if !raw.trim().is_empty() {
                    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                        AppError::Validation(format!(
                            "date_applied must be formatted YYYY-MM-DD, got '{raw}'"
                        ))
                    })?;
                    form.date_applied = Some(date);
                }
            }
            "status" => {
                let raw = read_text(field, &name).await?;
                if !raw.trim().is_empty() {
                    form.status = Some(raw.trim().parse().map_err(AppError::Validation)?);
                }
            }
            other => info!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use super::*;
    use crate::llm_client::LlmError;

    #[derive(Default)]
    struct RecordingBackend {
        fit_calls: AtomicUsize,
        question_calls: AtomicUsize,
        fail_fit: bool,
    }

    #[async_trait]
    impl GenerativeBackend for RecordingBackend {
        async fn analyze_fit(&self, _cv_text: &str, _jd_text: &str) -> Result<String, LlmError> {
            self.fit_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_fit {
                return Err(LlmError::Api {
                    status: 429,
                    message: "quota exceeded".to_string(),
                });
            }
            Ok("Strengths: Rust. Missing: Kubernetes. Score: 7/10".to_string())
        }

        async fn generate_questions(&self, _jd_text: &str, _role: &str) -> Result<String, LlmError> {
            self.question_calls.fetch_add(1, Ordering::SeqCst);
            Ok("1. Tell me about a Rust service you shipped.".to_string())
        }

        fn model(&self) -> &'static str {
            "test-backend"
        }
    }

    fn form(status: Option<ApplicationStatus>) -> SubmissionForm {
        SubmissionForm {
            role: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            expected_salary: 120_000,
            date_applied: NaiveDate::from_ymd_opt(2026, 8, 1),
            status,
            job_description: "Build and run Rust services.".to_string(),
            cv_filename: "cv.txt".to_string(),
            cv_data: Bytes::from_static(b"Rust engineer, five years."),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> TrackerStore {
        TrackerStore::new(dir.path().join("job_tracker.csv"))
    }

    #[tokio::test]
    async fn missing_credential_blocks_before_the_store_is_touched() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let err = process_submission(None, &store, form(None)).await.unwrap_err();

        assert!(matches!(err, AppError::MissingCredential));
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_cv_or_job_description_creates_no_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let backend = RecordingBackend::default();

        let mut no_cv = form(None);
        no_cv.cv_data = Bytes::new();
        let err = process_submission(Some(&backend), &store, no_cv)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut no_jd = form(None);
        no_jd.job_description = "   ".to_string();
        let err = process_submission(Some(&backend), &store, no_jd)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert_eq!(backend.fit_calls.load(Ordering::SeqCst), 0);
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_interview_status_never_generates_questions() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let backend = RecordingBackend::default();

        let response = process_submission(Some(&backend), &store, form(None))
            .await
            .unwrap();

        assert_eq!(backend.question_calls.load(Ordering::SeqCst), 0);
        assert!(response.interview_questions.is_none());
        assert_eq!(response.record.status, ApplicationStatus::Applied);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn interview_status_returns_summary_and_questions() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let backend = RecordingBackend::default();

        let response = process_submission(
            Some(&backend),
            &store,
            form(Some(ApplicationStatus::Interview)),
        )
        .await
        .unwrap();

        assert_eq!(backend.fit_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.question_calls.load(Ordering::SeqCst), 1);
        assert!(response.fit_summary.contains("Score"));
        assert!(response.interview_questions.is_some());

        let saved = store.load().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].status, ApplicationStatus::Interview);
        assert_eq!(saved[0].fit_summary, response.fit_summary);
    }

    #[tokio::test]
    async fn failed_analysis_persists_nothing() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let backend = RecordingBackend {
            fail_fit: true,
            ..Default::default()
        };

        let err = process_submission(Some(&backend), &store, form(None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn date_applied_defaults_to_today() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let backend = RecordingBackend::default();

        let mut input = form(None);
        input.date_applied = None;
        let response = process_submission(Some(&backend), &store, input)
            .await
            .unwrap();

        assert_eq!(response.record.date_applied, Local::now().date_naive());
    }

    #[tokio::test]
    async fn repeated_submissions_keep_prior_rows_first() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let backend = RecordingBackend::default();

        let mut first = form(None);
        first.role = "First Role".to_string();
        process_submission(Some(&backend), &store, first).await.unwrap();

        let mut second = form(None);
        second.role = "Second Role".to_string();
        process_submission(Some(&backend), &store, second).await.unwrap();

        let saved = store.load().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].role, "First Role");
        assert_eq!(saved[1].role, "Second Role");
    }
}

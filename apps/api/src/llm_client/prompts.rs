//! Prompt templates for the two generation operations. `{placeholders}` are
//! replaced before sending; the response text passes through verbatim.

/// Fit analysis prompt. Replace `{cv_text}` and `{jd_text}` before sending.
pub const FIT_ANALYSIS_TEMPLATE: &str = r#"Compare this candidate's CV with the following job description.

CV:
{cv_text}

Job Description:
{jd_text}

Provide:
1. Strengths relevant to the job.
2. Missing skills/experience.
3. Overall match score out of 10."#;

/// Interview question prompt. Replace `{role}` and `{jd_text}` before sending.
pub const INTERVIEW_QUESTIONS_TEMPLATE: &str = r#"Generate 5 job-specific interview questions with suggested answers for a {role}.

Job Description:
{jd_text}"#;

/// Fills the fit analysis template.
pub fn fit_prompt(cv_text: &str, jd_text: &str) -> String {
    FIT_ANALYSIS_TEMPLATE
        .replace("{cv_text}", cv_text)
        .replace("{jd_text}", jd_text)
}

/// Fills the interview question template.
pub fn questions_prompt(jd_text: &str, role: &str) -> String {
    INTERVIEW_QUESTIONS_TEMPLATE
        .replace("{role}", role)
        .replace("{jd_text}", jd_text)
}

//! Shared error types for the services crate.

use thiserror::Error;

use survey_core::model::{AnswerError, QuestionError, QuestionId};

/// Fallback shown when the backend rejects a submission without a detail.
pub const DEFAULT_REPORT_FAILURE: &str = "Failed to generate report";

/// Errors emitted by `SurveyApi` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}")]
    Backend {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Message suitable for the user: the backend detail when it sent one.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            ApiError::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Backend { detail: None, .. } => DEFAULT_REPORT_FAILURE.to_string(),
            ApiError::Http(err) => err.to_string(),
            ApiError::Malformed(reason) => reason.clone(),
        }
    }
}

/// Errors emitted while populating the question store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to fetch questions: {0}")]
    Api(#[from] ApiError),
    #[error("invalid question list: {0}")]
    Invalid(#[from] QuestionError),
    #[error("question list is empty")]
    Empty,
}

/// Rejected navigation or submission; the flow state is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error("Please answer the current question first")]
    CurrentUnanswered,
    #[error("Please answer all questions before submitting")]
    Incomplete { missing: Vec<QuestionId> },
    #[error("already at the first question")]
    AtFirst,
    #[error("already at the last question")]
    AtLast,
    #[error("survey is not accepting input right now")]
    NotInteractive,
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Errors emitted by `SurveyLoopService::submit`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] FlowError),
    #[error("Failed to generate report: {}", .0.detail())]
    Api(#[from] ApiError),
}

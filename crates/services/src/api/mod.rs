//! Port to the survey backend and its HTTP adapter.

mod http;
mod wire;

use async_trait::async_trait;
use survey_core::model::AnswerState;

use crate::error::ApiError;

pub use http::{ApiConfig, HttpSurveyApi};
pub use wire::{QuestionRecord, decode_analysis, decode_questions};

/// Markdown report returned by the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub markdown: String,
}

impl Report {
    #[must_use]
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }
}

/// Backend contract: one question source and one analysis endpoint.
///
/// Each call is a single attempt; callers never retry.
#[async_trait]
pub trait SurveyApi: Send + Sync {
    /// Fetch the raw question list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-2xx status, or an
    /// undecodable body.
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, ApiError>;

    /// Submit the answers and receive the analysis report.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` carrying the backend `detail` on non-2xx,
    /// or another `ApiError` for transport/decoding failures.
    async fn analyze(&self, answers: &AnswerState) -> Result<Report, ApiError>;
}

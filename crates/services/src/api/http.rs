use async_trait::async_trait;
use reqwest::Client;
use survey_core::model::AnswerState;
use url::Url;

use super::wire::{QuestionRecord, decode_analysis, decode_questions};
use super::{Report, SurveyApi};
use crate::error::ApiError;

const QUESTIONS_PATH: &str = "api/questions";
const ANALYZE_PATH: &str = "api/analyze";

/// Where the survey backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8000/";

    /// Parse a base URL. A trailing slash is added so endpoint paths join
    /// below it instead of replacing the last segment.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when `raw` is not an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let trimmed = raw.trim();
        let mut base_url = Url::parse(trimmed)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Malformed(format!("bad endpoint {path}: {err}")))
    }
}

/// `SurveyApi` over HTTP with a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpSurveyApi {
    client: Client,
    config: ApiConfig,
}

impl HttpSurveyApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SurveyApi for HttpSurveyApi {
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        let url = self.config.endpoint(QUESTIONS_PATH)?;
        tracing::debug!(%url, "fetching questions");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_questions(status, &body)
    }

    async fn analyze(&self, answers: &AnswerState) -> Result<Report, ApiError> {
        let url = self.config.endpoint(ANALYZE_PATH)?;
        tracing::debug!(%url, answers = answers.len(), "submitting answers");

        let response = self.client.post(url).json(answers).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_analysis(status, &body)
    }
}

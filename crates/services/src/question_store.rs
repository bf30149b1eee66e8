use std::sync::Arc;

use survey_core::model::{Question, QuestionId, ensure_unique_ids};

use crate::api::{QuestionRecord, SurveyApi};
use crate::error::LoadError;

/// Ordered, immutable question list fetched once at startup.
///
/// Cloning shares the underlying slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStore {
    questions: Arc<[Question]>,
}

impl QuestionStore {
    /// Fetch and validate the question list.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Api` when the request fails, `LoadError::Invalid`
    /// for malformed questions, and `LoadError::Empty` for an empty list.
    pub async fn load(api: &dyn SurveyApi) -> Result<Self, LoadError> {
        let records = api.fetch_questions().await?;
        let store = Self::from_records(records)?;
        tracing::info!(count = store.len(), "loaded survey questions");
        Ok(store)
    }

    /// # Errors
    ///
    /// Returns `LoadError` if any record is invalid or the list is empty.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, LoadError> {
        let questions = records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_questions(questions)
    }

    /// # Errors
    ///
    /// Returns `LoadError::Empty` for no questions and `LoadError::Invalid`
    /// for repeated ids.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, LoadError> {
        if questions.is_empty() {
            return Err(LoadError::Empty);
        }
        ensure_unique_ids(&questions)?;
        Ok(Self {
            questions: questions.into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a loaded store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

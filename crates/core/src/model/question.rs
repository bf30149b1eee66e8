use thiserror::Error;

use crate::model::ids::{OptionKey, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("closed question {0} has no options")]
    MissingOptions(QuestionId),

    #[error("question {0} has an empty option key")]
    EmptyOptionKey(QuestionId),

    #[error("question {id} lists option {key} twice")]
    DuplicateOption { id: QuestionId, key: OptionKey },

    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One selectable option of a closed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub key: OptionKey,
    pub label: String,
}

/// Whether a question takes free text or one of a fixed set of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Open,
    /// Options keep the order the backend listed them in.
    Closed { options: Vec<ChoiceOption> },
}

/// A single survey question. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    kind: QuestionKind,
}

impl Question {
    /// Creates a free-text question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyId` if the id is blank.
    pub fn open(id: QuestionId, text: impl Into<String>) -> Result<Self, QuestionError> {
        if id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        Ok(Self {
            id,
            text: text.into(),
            kind: QuestionKind::Open,
        })
    }

    /// Creates a multiple-choice question from `(key, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id is blank, there are no options,
    /// or an option key is blank or repeated.
    pub fn closed<K, L>(
        id: QuestionId,
        text: impl Into<String>,
        options: impl IntoIterator<Item = (K, L)>,
    ) -> Result<Self, QuestionError>
    where
        K: Into<String>,
        L: Into<String>,
    {
        if id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }

        let mut parsed: Vec<ChoiceOption> = Vec::new();
        for (key, label) in options {
            let key = OptionKey::new(key);
            if key.as_str().trim().is_empty() {
                return Err(QuestionError::EmptyOptionKey(id));
            }
            if parsed.iter().any(|option| option.key == key) {
                return Err(QuestionError::DuplicateOption { id, key });
            }
            parsed.push(ChoiceOption {
                key,
                label: label.into(),
            });
        }

        if parsed.is_empty() {
            return Err(QuestionError::MissingOptions(id));
        }

        Ok(Self {
            id,
            text: text.into(),
            kind: QuestionKind::Closed { options: parsed },
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.kind, QuestionKind::Open)
    }

    /// Options of a closed question; empty for open questions.
    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            QuestionKind::Open => &[],
            QuestionKind::Closed { options } => options,
        }
    }

    #[must_use]
    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options().iter().any(|option| &option.key == key)
    }
}

/// Checks that every question id occurs once.
///
/// # Errors
///
/// Returns `QuestionError::DuplicateQuestion` naming the first repeated id.
pub fn ensure_unique_ids(questions: &[Question]) -> Result<(), QuestionError> {
    let mut seen = std::collections::HashSet::with_capacity(questions.len());
    for question in questions {
        if !seen.insert(question.id()) {
            return Err(QuestionError::DuplicateQuestion(question.id().clone()));
        }
    }
    Ok(())
}

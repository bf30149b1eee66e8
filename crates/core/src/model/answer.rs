use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::model::ids::{OptionKey, QuestionId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("no question with id {0}")]
    UnknownQuestion(QuestionId),

    #[error("question {0} expects a selected option, not free text")]
    ExpectedChoice(QuestionId),

    #[error("question {0} expects free text, not an option")]
    ExpectedText(QuestionId),

    #[error("question {id} has no option {key}")]
    UnknownOption { id: QuestionId, key: OptionKey },
}

//
// ─── ANSWER VALUE ──────────────────────────────────────────────────────────────
//

/// Current answer to one question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnswerValue {
    #[default]
    Unanswered,
    /// Free text for an open question. Empty text counts as unanswered.
    Text(String),
    /// Selected option of a closed question.
    Choice(OptionKey),
}

impl AnswerValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn choice(key: impl Into<String>) -> Self {
        Self::Choice(OptionKey::new(key))
    }

    /// Whether this value satisfies the question.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            AnswerValue::Unanswered => false,
            AnswerValue::Text(text) => !text.is_empty(),
            AnswerValue::Choice(_) => true,
        }
    }

    /// The raw string sent to the backend, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Unanswered => None,
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Choice(key) => Some(key.as_str()),
        }
    }
}

impl Serialize for AnswerValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_none(),
        }
    }
}

//
// ─── ANSWER STATE ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Open,
    Closed(Vec<OptionKey>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: QuestionId,
    shape: Shape,
    value: AnswerValue,
}

/// Answers keyed by question id, kept in question order.
///
/// Every question the state was built from has exactly one entry, so lookups
/// by a known id never miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerState {
    entries: Vec<Entry>,
    index: HashMap<QuestionId, usize>,
}

impl AnswerState {
    /// Builds the state with every question unanswered.
    #[must_use]
    pub fn for_questions(questions: &[Question]) -> Self {
        let entries: Vec<Entry> = questions
            .iter()
            .map(|question| Entry {
                id: question.id().clone(),
                shape: if question.is_open() {
                    Shape::Open
                } else {
                    Shape::Closed(
                        question
                            .options()
                            .iter()
                            .map(|option| option.key.clone())
                            .collect(),
                    )
                },
                value: AnswerValue::Unanswered,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id.clone(), pos))
            .collect();
        Self { entries, index }
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&AnswerValue> {
        self.index.get(id).map(|&pos| &self.entries[pos].value)
    }

    /// Replaces the answer for `id`.
    ///
    /// `AnswerValue::Unanswered` is accepted for any question and clears it.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if the id is unknown, the value kind does not
    /// match the question, or the option key is not offered.
    pub fn set(&mut self, id: &QuestionId, value: AnswerValue) -> Result<(), AnswerError> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| AnswerError::UnknownQuestion(id.clone()))?;
        let entry = &mut self.entries[pos];

        match (&entry.shape, &value) {
            (_, AnswerValue::Unanswered)
            | (Shape::Open, AnswerValue::Text(_)) => {}
            (Shape::Open, AnswerValue::Choice(_)) => {
                return Err(AnswerError::ExpectedText(id.clone()));
            }
            (Shape::Closed(_), AnswerValue::Text(_)) => {
                return Err(AnswerError::ExpectedChoice(id.clone()));
            }
            (Shape::Closed(keys), AnswerValue::Choice(key)) => {
                if !keys.contains(key) {
                    return Err(AnswerError::UnknownOption {
                        id: id.clone(),
                        key: key.clone(),
                    });
                }
            }
        }

        entry.value = value;
        Ok(())
    }

    #[must_use]
    pub fn is_present(&self, id: &QuestionId) -> bool {
        self.get(id).is_some_and(AnswerValue::is_present)
    }

    /// True iff every question has a present answer.
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.entries.iter().all(|entry| entry.value.is_present())
    }

    /// Ids still lacking a present answer, in question order.
    #[must_use]
    pub fn unanswered(&self) -> Vec<&QuestionId> {
        self.entries
            .iter()
            .filter(|entry| !entry.value.is_present())
            .map(|entry| &entry.id)
            .collect()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value.is_present())
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes as the JSON object `{ id: value }` the analysis endpoint takes.
impl Serialize for AnswerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.id, &entry.value)?;
        }
        map.end()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

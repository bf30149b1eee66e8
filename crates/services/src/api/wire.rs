use std::fmt;

use reqwest::StatusCode;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use survey_core::model::{Question, QuestionError, QuestionId};

use super::Report;
use crate::error::ApiError;

/// Question as it arrives from `GET /api/questions`.
///
/// Mirrors the wire shape so the domain `Question` stays free of serde
/// defaults and ordering quirks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    /// Closed questions often omit the flag entirely.
    #[serde(default)]
    pub is_open: bool,
    #[serde(default, deserialize_with = "ordered_options")]
    pub options: Option<Vec<(String, String)>>,
}

impl QuestionRecord {
    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for blank ids or closed questions without
    /// usable options.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id);
        if self.is_open {
            Question::open(id, self.text)
        } else {
            Question::closed(id, self.text, self.options.unwrap_or_default())
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsEnvelope {
    questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    report: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Decode a `GET /api/questions` response.
///
/// # Errors
///
/// Returns `ApiError::Backend` for non-2xx statuses and
/// `ApiError::Malformed` when the body is not a question envelope.
pub fn decode_questions(status: StatusCode, body: &[u8]) -> Result<Vec<QuestionRecord>, ApiError> {
    if !status.is_success() {
        return Err(backend_error(status, body));
    }
    let envelope: QuestionsEnvelope =
        serde_json::from_slice(body).map_err(|err| ApiError::Malformed(err.to_string()))?;
    Ok(envelope.questions)
}

/// Decode a `POST /api/analyze` response.
///
/// # Errors
///
/// Returns `ApiError::Backend` (with the backend `detail`, if any) for non-2xx
/// statuses and `ApiError::Malformed` when a 2xx body lacks a `report`.
pub fn decode_analysis(status: StatusCode, body: &[u8]) -> Result<Report, ApiError> {
    if !status.is_success() {
        return Err(backend_error(status, body));
    }
    let envelope: ReportEnvelope =
        serde_json::from_slice(body).map_err(|err| ApiError::Malformed(err.to_string()))?;
    Ok(Report::new(envelope.report))
}

fn backend_error(status: StatusCode, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.detail)
        .and_then(|detail| match detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) if text.is_empty() => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });
    ApiError::Backend { status, detail }
}

fn ordered_options<'de, D>(deserializer: D) -> Result<Option<Vec<(String, String)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionsVisitor;

    impl<'de> Visitor<'de> for OptionsVisitor {
        type Value = Option<Vec<(String, String)>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping option keys to labels")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, inner: D2) -> Result<Self::Value, D2::Error> {
            inner.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut options = Vec::with_capacity(map.size_hint().unwrap_or(4));
            while let Some((key, label)) = map.next_entry::<String, String>()? {
                options.push((key, label));
            }
            Ok(Some(options))
        }
    }

    deserializer.deserialize_option(OptionsVisitor)
}

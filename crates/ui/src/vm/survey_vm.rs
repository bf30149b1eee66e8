use services::{FlowError, NavButtons, SubmitError, SurveyFlow, SurveyLoopService, SurveyPhase};
use survey_core::model::{AnswerValue, OptionKey};

use crate::views::ViewError;
use crate::vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyIntent {
    Start,
    SelectOption(OptionKey),
    InputText(String),
    Next,
    Prev,
    Submit,
}

/// Banner shown above the current section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Rejected input; nothing changed.
    Warning(String),
    /// A request failed.
    Alert(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(message) | Notice::Alert(message) => message,
        }
    }

    #[must_use]
    pub fn class(&self) -> &'static str {
        match self {
            Notice::Warning(_) => "notice notice--warning",
            Notice::Alert(_) => "notice notice--alert",
        }
    }

    /// Only the answer gates reach the user; the rest cannot be triggered
    /// from rendered controls.
    #[must_use]
    pub fn for_flow(err: &FlowError) -> Option<Self> {
        match err {
            FlowError::CurrentUnanswered | FlowError::Incomplete { .. } => {
                Some(Notice::Warning(err.to_string()))
            }
            other => {
                tracing::debug!(error = %other, "intent ignored");
                None
            }
        }
    }

    #[must_use]
    pub fn for_submit(err: &SubmitError) -> Option<Self> {
        match err {
            SubmitError::Rejected(flow) => Self::for_flow(flow),
            other => Some(Notice::Alert(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub key: OptionKey,
    /// `"{key}. {label}"`
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionVm {
    pub id: String,
    /// `"Question {n} / {total}"`
    pub label: String,
    pub text: String,
    pub is_open: bool,
    pub answer_text: String,
    pub options: Vec<OptionVm>,
    pub progress: f32,
    pub buttons: NavButtons,
}

pub struct SurveyVm {
    flow: SurveyFlow,
}

impl SurveyVm {
    #[must_use]
    pub fn new(flow: SurveyFlow) -> Self {
        Self { flow }
    }

    #[must_use]
    pub fn phase(&self) -> SurveyPhase {
        self.flow.phase()
    }

    #[must_use]
    pub fn flow(&self) -> &SurveyFlow {
        &self.flow
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.flow.len()
    }

    #[must_use]
    pub fn question(&self) -> Option<QuestionVm> {
        if self.flow.phase() != SurveyPhase::Question {
            return None;
        }
        let question = self.flow.current_question()?;
        let answer = self.flow.current_answer();
        let selected = match answer {
            Some(AnswerValue::Choice(key)) => Some(key),
            _ => None,
        };
        let options = question
            .options()
            .iter()
            .map(|option| OptionVm {
                key: option.key.clone(),
                text: format!("{}. {}", option.key, option.label),
                selected: selected == Some(&option.key),
            })
            .collect();

        Some(QuestionVm {
            id: question.id().to_string(),
            label: format!("Question {} / {}", self.flow.cursor() + 1, self.flow.len()),
            text: question.text().to_string(),
            is_open: question.is_open(),
            answer_text: match answer {
                Some(AnswerValue::Text(text)) => text.clone(),
                _ => String::new(),
            },
            options,
            progress: self.flow.question_progress(),
            buttons: self.flow.buttons(),
        })
    }

    #[must_use]
    pub fn report_html(&self) -> Option<String> {
        self.flow
            .report()
            .map(|report| markdown_to_html(&report.markdown))
    }

    /// Apply a synchronous intent. `Submit` goes through [`SurveyVm::submit`].
    ///
    /// # Errors
    ///
    /// Returns the flow's rejection; the state is unchanged in that case.
    pub fn apply(&mut self, intent: SurveyIntent) -> Result<(), FlowError> {
        match intent {
            SurveyIntent::Start => self.flow.start(),
            SurveyIntent::SelectOption(key) => self.flow.select_option(key),
            SurveyIntent::InputText(text) => self.flow.answer_text(text),
            SurveyIntent::Next => self.flow.next(),
            SurveyIntent::Prev => self.flow.prev(),
            SurveyIntent::Submit => Err(FlowError::NotInteractive),
        }
    }

    /// # Errors
    ///
    /// Returns `SubmitError` when the gate rejects or the request fails.
    pub async fn submit(
        &mut self,
        survey_loop: &SurveyLoopService,
        on_progress: impl FnMut(f32),
    ) -> Result<(), SubmitError> {
        survey_loop.submit(&mut self.flow, on_progress).await
    }
}

/// # Errors
///
/// Returns `ViewError::LoadFailed` for any load failure.
pub async fn start_survey(survey_loop: &SurveyLoopService) -> Result<SurveyVm, ViewError> {
    survey_loop
        .start_survey()
        .await
        .map(SurveyVm::new)
        .map_err(|err| {
            tracing::debug!(error = %err, "showing load failure");
            ViewError::LoadFailed
        })
}

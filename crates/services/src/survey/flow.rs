use std::fmt;

use survey_core::model::{AnswerState, AnswerValue, OptionKey, Question};

use crate::api::Report;
use crate::error::FlowError;
use crate::question_store::QuestionStore;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the user is in the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyPhase {
    Intro,
    /// Showing the question at the cursor.
    Question,
    Submitting,
    Report,
}

/// Which navigation controls the question view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButtons {
    pub show_prev: bool,
    pub show_next: bool,
    pub next_enabled: bool,
    pub show_submit: bool,
}

//
// ─── FLOW ──────────────────────────────────────────────────────────────────────
//

/// One survey session: questions, answers, cursor and phase.
///
/// Owned by the UI controller; every mutation goes through a transition
/// method, and a rejected transition leaves the flow untouched.
#[derive(Clone)]
pub struct SurveyFlow {
    store: QuestionStore,
    answers: AnswerState,
    cursor: usize,
    phase: SurveyPhase,
    report: Option<Report>,
}

impl SurveyFlow {
    #[must_use]
    pub fn new(store: QuestionStore) -> Self {
        let answers = AnswerState::for_questions(store.questions());
        Self {
            store,
            answers,
            cursor: 0,
            phase: SurveyPhase::Intro,
            report: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SurveyPhase {
        self.phase
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Always false: the store refuses empty question lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.store.len()
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionStore {
        &self.store
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Question under the cursor.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.store.get(self.cursor)
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerValue> {
        self.current_question()
            .and_then(|question| self.answers.get(question.id()))
    }

    #[must_use]
    pub fn current_answered(&self) -> bool {
        self.current_answer().is_some_and(AnswerValue::is_present)
    }

    /// Width of the question progress bar, in percent.
    #[must_use]
    pub fn question_progress(&self) -> f32 {
        let total = self.store.len().max(1) as f32;
        (self.cursor + 1) as f32 / total * 100.0
    }

    #[must_use]
    pub fn buttons(&self) -> NavButtons {
        let answered = self.current_answered();
        let last = self.is_last();
        NavButtons {
            show_prev: self.cursor > 0,
            show_next: !last,
            next_enabled: !last && answered,
            show_submit: last && answered,
        }
    }

    /// `Intro -> Question(0)`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` outside the intro.
    pub fn start(&mut self) -> Result<(), FlowError> {
        if self.phase != SurveyPhase::Intro {
            return Err(FlowError::NotInteractive);
        }
        self.cursor = 0;
        self.phase = SurveyPhase::Question;
        Ok(())
    }

    /// Replace the free-text answer of the current question.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` outside the question view and
    /// `FlowError::Answer` if the current question is closed.
    pub fn answer_text(&mut self, text: impl Into<String>) -> Result<(), FlowError> {
        self.set_current(AnswerValue::Text(text.into()))
    }

    /// Select an option of the current question, replacing any prior choice.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` outside the question view and
    /// `FlowError::Answer` for open questions or unknown keys.
    pub fn select_option(&mut self, key: OptionKey) -> Result<(), FlowError> {
        self.set_current(AnswerValue::Choice(key))
    }

    fn set_current(&mut self, value: AnswerValue) -> Result<(), FlowError> {
        self.ensure_interactive()?;
        let id = self
            .current_question()
            .map(|question| question.id().clone())
            .ok_or(FlowError::NotInteractive)?;
        self.answers.set(&id, value)?;
        Ok(())
    }

    /// Advance to the next question.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::CurrentUnanswered` if the current answer is missing
    /// and `FlowError::AtLast` on the final question (submit instead).
    pub fn next(&mut self) -> Result<(), FlowError> {
        self.ensure_interactive()?;
        if !self.current_answered() {
            tracing::debug!(cursor = self.cursor, "next rejected: current question unanswered");
            return Err(FlowError::CurrentUnanswered);
        }
        if self.is_last() {
            return Err(FlowError::AtLast);
        }
        self.cursor += 1;
        Ok(())
    }

    /// Go back one question.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::AtFirst` on the first question.
    pub fn prev(&mut self) -> Result<(), FlowError> {
        self.ensure_interactive()?;
        if self.cursor == 0 {
            return Err(FlowError::AtFirst);
        }
        self.cursor -= 1;
        Ok(())
    }

    /// Enter `Submitting` and hand back the answers to send.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Incomplete` listing the unanswered ids; the flow
    /// stays on the current question.
    pub fn submit(&mut self) -> Result<AnswerState, FlowError> {
        self.ensure_interactive()?;
        if !self.answers.all_answered() {
            let missing: Vec<_> = self.answers.unanswered().into_iter().cloned().collect();
            tracing::debug!(missing = missing.len(), "submit rejected: survey incomplete");
            return Err(FlowError::Incomplete { missing });
        }
        self.phase = SurveyPhase::Submitting;
        Ok(self.answers.clone())
    }

    /// `Submitting -> Report`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` when no submission is in flight.
    pub fn complete(&mut self, report: Report) -> Result<(), FlowError> {
        if self.phase != SurveyPhase::Submitting {
            return Err(FlowError::NotInteractive);
        }
        self.report = Some(report);
        self.phase = SurveyPhase::Report;
        Ok(())
    }

    /// `Submitting -> Question(cursor)` after a failed request.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotInteractive` when no submission is in flight.
    pub fn fail(&mut self) -> Result<(), FlowError> {
        if self.phase != SurveyPhase::Submitting {
            return Err(FlowError::NotInteractive);
        }
        self.phase = SurveyPhase::Question;
        Ok(())
    }

    fn ensure_interactive(&self) -> Result<(), FlowError> {
        if self.phase == SurveyPhase::Question {
            Ok(())
        } else {
            Err(FlowError::NotInteractive)
        }
    }
}

impl fmt::Debug for SurveyFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveyFlow")
            .field("questions_len", &self.store.len())
            .field("answered", &self.answers.answered_count())
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("has_report", &self.report.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

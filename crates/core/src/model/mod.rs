mod answer;
mod ids;
mod question;

pub use answer::{AnswerError, AnswerState, AnswerValue};
pub use ids::{OptionKey, QuestionId};
pub use question::{ChoiceOption, Question, QuestionError, QuestionKind, ensure_unique_ids};

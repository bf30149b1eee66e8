#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod question_store;
pub mod survey;

pub use api::{ApiConfig, HttpSurveyApi, QuestionRecord, Report, SurveyApi};
pub use error::{ApiError, FlowError, LoadError, SubmitError};
pub use question_store::QuestionStore;
pub use reqwest::StatusCode;
pub use survey::{
    NavButtons, ProgressConfig, SurveyFlow, SurveyLoopService, SurveyPhase, SyntheticProgress,
};

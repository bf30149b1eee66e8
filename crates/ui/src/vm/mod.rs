mod markdown_vm;
mod survey_vm;

pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use survey_vm::{
    Notice, OptionVm, QuestionVm, SurveyIntent, SurveyVm, start_survey,
};

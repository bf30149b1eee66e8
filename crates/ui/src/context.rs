use std::sync::Arc;

use services::SurveyLoopService;

pub trait UiApp: Send + Sync {
    fn survey_loop(&self) -> Arc<SurveyLoopService>;
}

#[derive(Clone)]
pub struct AppContext {
    survey_loop: Arc<SurveyLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            survey_loop: app.survey_loop(),
        }
    }

    #[must_use]
    pub fn survey_loop(&self) -> Arc<SurveyLoopService> {
        Arc::clone(&self.survey_loop)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

use std::pin::pin;
use std::sync::Arc;

use tokio::time::{Instant, interval_at, sleep};

use super::flow::SurveyFlow;
use super::progress::{ProgressConfig, SyntheticProgress};
use crate::api::SurveyApi;
use crate::error::{LoadError, SubmitError};
use crate::question_store::QuestionStore;

/// Orchestrates question loading and the submit-and-report sequence.
#[derive(Clone)]
pub struct SurveyLoopService {
    api: Arc<dyn SurveyApi>,
    progress: ProgressConfig,
}

impl SurveyLoopService {
    #[must_use]
    pub fn new(api: Arc<dyn SurveyApi>) -> Self {
        Self {
            api,
            progress: ProgressConfig::default(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressConfig) -> Self {
        self.progress = progress;
        self
    }

    /// Load the questions and open a session in the intro phase.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` when the fetch fails or the list is malformed.
    pub async fn start_survey(&self) -> Result<SurveyFlow, LoadError> {
        let store = QuestionStore::load(self.api.as_ref()).await.inspect_err(|err| {
            tracing::error!(error = %err, "survey failed to load");
        })?;
        Ok(SurveyFlow::new(store))
    }

    /// Submit the answers, driving the synthetic progress bar meanwhile.
    ///
    /// `on_progress` receives percentages: ticks capped below 100 while the
    /// request is in flight, then 100 once a report arrives. The ticker is
    /// dropped as soon as the request resolves, so a failure produces no
    /// further updates.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Rejected` when the flow refuses to submit
    /// (nothing is sent), or `SubmitError::Api` when the request failed; in
    /// that case the flow is back on the question it was submitted from.
    pub async fn submit(
        &self,
        flow: &mut SurveyFlow,
        mut on_progress: impl FnMut(f32),
    ) -> Result<(), SubmitError> {
        let payload = flow.submit()?;
        tracing::info!(answers = payload.len(), "submitting survey");

        let mut progress = SyntheticProgress::new(&self.progress);
        on_progress(progress.value());

        let result = {
            let mut request = pin!(self.api.analyze(&payload));
            let period = self.progress.tick();
            let mut ticker = interval_at(Instant::now() + period, period);
            let mut ticking = true;
            loop {
                tokio::select! {
                    biased;
                    result = &mut request => break result,
                    _ = ticker.tick(), if ticking => {
                        on_progress(progress.tick());
                        ticking = !progress.is_capped();
                    }
                }
            }
        };

        match result {
            Ok(report) => {
                on_progress(progress.complete());
                sleep(self.progress.reveal_delay()).await;
                flow.complete(report)?;
                tracing::info!("survey report received");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "survey submission failed");
                flow.fail()?;
                Err(SubmitError::Api(err))
            }
        }
    }
}

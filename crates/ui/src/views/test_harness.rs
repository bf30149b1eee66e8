use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{
    ApiError, ProgressConfig, QuestionRecord, Report, StatusCode, SurveyApi, SurveyLoopService,
};
use survey_core::model::AnswerState;

use crate::context::{UiApp, build_app_context};
use crate::views::SurveyView;
use crate::vm::SurveyIntent;

use super::survey::SurveyTestHandles;

#[derive(Clone, Copy)]
pub enum Analysis {
    Report(&'static str),
    Failure(u16, &'static str),
}

pub struct FakeSurveyApi {
    questions: Option<Vec<QuestionRecord>>,
    /// Consumed front to back; the last outcome repeats.
    analyses: Mutex<VecDeque<Analysis>>,
    latency: Duration,
    submitted: Mutex<Vec<AnswerState>>,
}

impl FakeSurveyApi {
    /// Two closed questions with options A/B, then one open question.
    pub fn three_questions(analysis: Analysis) -> Self {
        let closed = |id: &str, text: &str| QuestionRecord {
            id: id.to_string(),
            text: text.to_string(),
            is_open: false,
            options: Some(vec![
                ("A".to_string(), "Yes".to_string()),
                ("B".to_string(), "No".to_string()),
            ]),
        };
        Self {
            questions: Some(vec![
                closed("Q1", "Do you enjoy mornings?"),
                closed("Q2", "Do you plan ahead?"),
                QuestionRecord {
                    id: "Q3".to_string(),
                    text: "What motivates you?".to_string(),
                    is_open: true,
                    options: None,
                },
            ]),
            analyses: Mutex::new(VecDeque::from([analysis])),
            latency: Duration::ZERO,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Outcome for the submission after the ones already queued.
    pub fn then(self, analysis: Analysis) -> Self {
        self.analyses.lock().unwrap().push_back(analysis);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn unreachable() -> Self {
        Self {
            questions: None,
            ..Self::three_questions(Analysis::Report(""))
        }
    }

    pub fn submitted(&self) -> Vec<AnswerState> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SurveyApi for FakeSurveyApi {
    async fn fetch_questions(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        self.questions.clone().ok_or(ApiError::Malformed("connection refused".to_string()))
    }

    async fn analyze(&self, answers: &AnswerState) -> Result<Report, ApiError> {
        self.submitted.lock().unwrap().push(answers.clone());
        let analysis = {
            let mut analyses = self.analyses.lock().unwrap();
            if analyses.len() > 1 {
                analyses.pop_front().unwrap()
            } else {
                *analyses.front().unwrap()
            }
        };
        tokio::time::sleep(self.latency).await;
        match analysis {
            Analysis::Report(markdown) => Ok(Report::new(markdown)),
            Analysis::Failure(status, detail) => Err(ApiError::Backend {
                status: StatusCode::from_u16(status).unwrap(),
                detail: Some(detail.to_string()),
            }),
        }
    }
}

#[derive(Clone)]
struct TestApp {
    survey_loop: Arc<SurveyLoopService>,
}

impl UiApp for TestApp {
    fn survey_loop(&self) -> Arc<SurveyLoopService> {
        Arc::clone(&self.survey_loop)
    }
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    handles: SurveyTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn SurveyHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { SurveyView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub api: Arc<FakeSurveyApi>,
    pub handles: SurveyTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive pending tasks until the rendered HTML satisfies `done`.
    pub async fn drive_until(&mut self, done: impl Fn(&str) -> bool) -> String {
        for _ in 0..40 {
            let html = self.render();
            if done(&html) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    pub fn dispatch(&mut self, intent: SurveyIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn cursor(&self) -> Option<usize> {
        let vm = self.handles.vm();
        self.dom
            .in_runtime(|| vm.read().as_ref().map(|vm| vm.flow().cursor()))
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(api: FakeSurveyApi) -> ViewHarness {
    setup_view_harness_with_progress(
        api,
        ProgressConfig::default()
            .with_duration(Duration::from_millis(200))
            .with_reveal_delay(Duration::ZERO),
    )
}

pub fn setup_view_harness_with_progress(api: FakeSurveyApi, progress: ProgressConfig) -> ViewHarness {
    let api = Arc::new(api);
    let survey_loop =
        SurveyLoopService::new(Arc::clone(&api) as Arc<dyn SurveyApi>).with_progress(progress);
    let handles = SurveyTestHandles::default();
    let app = Arc::new(TestApp {
        survey_loop: Arc::new(survey_loop),
    });

    let dom = VirtualDom::new_with_props(
        SurveyHarness,
        ViewHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness { dom, api, handles }
}

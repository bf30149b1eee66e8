use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{Notice, SurveyIntent, SurveyVm, start_survey};
use services::SurveyPhase;

use super::components::{IntroSection, LoadingSection, QuestionSection, ReportSection};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn SurveyView() -> Element {
    let ctx = use_context::<AppContext>();
    let survey_loop = ctx.survey_loop();

    let vm = use_signal(|| None::<SurveyVm>);
    let notice = use_signal(|| None::<Notice>);
    // Some while a submission is in flight.
    let submit_progress = use_signal(|| None::<f32>);

    let resource = {
        let survey_loop = survey_loop.clone();
        use_resource(move || {
            let survey_loop = survey_loop.clone();
            let mut vm = vm;
            async move {
                let started = start_survey(&survey_loop).await?;
                vm.set(Some(started));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(resource);

    let dispatch_intent = {
        let survey_loop = survey_loop.clone();
        use_callback(move |intent: SurveyIntent| {
            let mut vm = vm;
            let mut notice = notice;
            let mut submit_progress = submit_progress;

            match intent {
                SurveyIntent::Submit => {
                    // A previous failure belongs to its own request.
                    notice.set(None);
                    let survey_loop = survey_loop.clone();
                    spawn(async move {
                        let taken = vm.write().take();
                        let Some(mut vm_value) = taken else {
                            return;
                        };

                        let result = vm_value
                            .submit(&survey_loop, move |value| submit_progress.set(Some(value)))
                            .await;

                        // Put the flow back first so the view never renders without it.
                        vm.set(Some(vm_value));
                        submit_progress.set(None);
                        notice.set(result.err().as_ref().and_then(Notice::for_submit));
                    });
                }
                intent => {
                    let result = vm.write().as_mut().map(|vm| vm.apply(intent));
                    match result {
                        Some(Ok(())) => notice.set(None),
                        Some(Err(err)) => {
                            if let Some(warning) = Notice::for_flow(&err) {
                                notice.set(Some(warning));
                            }
                        }
                        None => {}
                    }
                }
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SurveyTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let (phase, question_count, question, report_html) = {
        let vm_guard = vm.read();
        let vm_ref = vm_guard.as_ref();
        (
            vm_ref.map(SurveyVm::phase),
            vm_ref.map_or(0, SurveyVm::question_count),
            vm_ref.and_then(SurveyVm::question),
            vm_ref.and_then(SurveyVm::report_html),
        )
    };
    let current_notice = notice.read().clone();
    let in_flight = *submit_progress.read();

    let body = match state {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "survey-status", "Loading survey..." }
        },
        ViewState::Error(err) => rsx! {
            div { class: "notice notice--alert", role: "alert", "{err.message()}" }
        },
        ViewState::Ready(()) => match (in_flight, phase) {
            (Some(progress), _) => rsx! {
                LoadingSection { progress }
            },
            (None, Some(SurveyPhase::Intro)) => rsx! {
                IntroSection { question_count, on_intent: dispatch_intent }
            },
            (None, Some(SurveyPhase::Report)) => rsx! {
                ReportSection { html: report_html.unwrap_or_default() }
            },
            (None, _) => match question {
                Some(question) => rsx! {
                    QuestionSection { question, on_intent: dispatch_intent }
                },
                None => rsx! {},
            },
        },
    };

    rsx! {
        div { class: "card survey",
            if let Some(notice) = current_notice {
                div { class: notice.class(), role: "alert", "{notice.message()}" }
            }
            {body}
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SurveyTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SurveyIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<SurveyVm>>>>>,
}

#[cfg(test)]
impl SurveyTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<SurveyIntent>,
        vm: Signal<Option<SurveyVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<SurveyIntent> {
        (*self.dispatch.borrow()).expect("survey dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<SurveyVm>> {
        (*self.vm.borrow()).expect("survey vm registered")
    }
}

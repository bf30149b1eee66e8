use dioxus::prelude::*;

use crate::vm::{OptionVm, QuestionVm, SurveyIntent};

#[component]
pub(super) fn IntroSection(question_count: usize, on_intent: EventHandler<SurveyIntent>) -> Element {
    rsx! {
        div { class: "intro-section", id: "intro-section",
            h1 { "Survey" }
            p { "{question_count} questions. Answer each one, then submit to receive your report." }
            button {
                class: "btn btn-primary",
                id: "start-btn",
                r#type: "button",
                onclick: move |_| on_intent.call(SurveyIntent::Start),
                "Start"
            }
        }
    }
}

#[component]
pub(super) fn QuestionSection(question: QuestionVm, on_intent: EventHandler<SurveyIntent>) -> Element {
    let buttons = question.buttons;
    let group = format!("question-{}", question.id);

    rsx! {
        div { class: "survey-section", id: "survey-section",
            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {question.progress}%" }
            }
            div { class: "question-number", "{question.label}" }
            div { class: "question-text", "{question.text}" }
            if question.is_open {
                div { class: "option-item",
                    textarea {
                        id: "answer-{question.id}",
                        class: "answer-text",
                        rows: "4",
                        placeholder: "Please enter your answer here...",
                        value: "{question.answer_text}",
                        oninput: move |evt: FormEvent| {
                            on_intent.call(SurveyIntent::InputText(evt.value()));
                        },
                    }
                }
            } else {
                ul { class: "options-list",
                    for option in question.options.iter().cloned() {
                        OptionRow {
                            key: "{option.key}",
                            option,
                            group: group.clone(),
                            on_intent,
                        }
                    }
                }
            }
            div { class: "nav-buttons",
                if buttons.show_prev {
                    button {
                        class: "btn btn-secondary",
                        id: "prev-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(SurveyIntent::Prev),
                        "Previous"
                    }
                }
                if buttons.show_next {
                    button {
                        class: "btn btn-primary",
                        id: "next-btn",
                        r#type: "button",
                        disabled: !buttons.next_enabled,
                        onclick: move |_| on_intent.call(SurveyIntent::Next),
                        "Next"
                    }
                }
                if buttons.show_submit {
                    button {
                        class: "btn btn-primary",
                        id: "submit-btn",
                        r#type: "button",
                        onclick: move |_| on_intent.call(SurveyIntent::Submit),
                        "Submit"
                    }
                }
            }
        }
    }
}

#[component]
fn OptionRow(option: OptionVm, group: String, on_intent: EventHandler<SurveyIntent>) -> Element {
    let class = if option.selected {
        "option-label selected"
    } else {
        "option-label"
    };
    let key = option.key.clone();

    rsx! {
        li { class: "option-item",
            label { class: "{class}",
                input {
                    r#type: "radio",
                    name: "{group}",
                    value: "{option.key}",
                    checked: option.selected,
                    onchange: move |_| on_intent.call(SurveyIntent::SelectOption(key.clone())),
                }
                span { class: "option-text", "{option.text}" }
            }
        }
    }
}

#[component]
pub(super) fn LoadingSection(progress: f32) -> Element {
    rsx! {
        div { class: "loading-section", id: "loading-section",
            h2 { "Generating your report..." }
            div { class: "progress-bar",
                div {
                    class: "progress-fill",
                    id: "loading-progress-fill",
                    style: "width: {progress}%",
                }
            }
        }
    }
}

#[component]
pub(super) fn ReportSection(html: String) -> Element {
    rsx! {
        div { class: "report-section", id: "report-section",
            h2 { "Your report" }
            div { class: "report-content", id: "report-content", dangerous_inner_html: "{html}" }
        }
    }
}

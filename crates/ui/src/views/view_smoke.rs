use std::time::Duration;

use services::ProgressConfig;
use survey_core::model::{AnswerValue, OptionKey, QuestionId};

use crate::vm::SurveyIntent;

use super::test_harness::{
    Analysis, FakeSurveyApi, ViewHarness, setup_view_harness, setup_view_harness_with_progress,
};

async fn loaded(api: FakeSurveyApi) -> ViewHarness {
    wait_for_intro(setup_view_harness(api)).await
}

async fn wait_for_intro(mut harness: ViewHarness) -> ViewHarness {
    harness.rebuild();
    let html = harness.drive_until(|html| html.contains("start-btn")).await;
    assert!(html.contains("start-btn"), "intro never rendered: {html}");
    harness
}

fn answer_all(harness: &mut ViewHarness) {
    harness.dispatch(SurveyIntent::Start);
    harness.dispatch(SurveyIntent::SelectOption(OptionKey::new("A")));
    harness.dispatch(SurveyIntent::Next);
    harness.dispatch(SurveyIntent::SelectOption(OptionKey::new("B")));
    harness.dispatch(SurveyIntent::Next);
    harness.dispatch(SurveyIntent::InputText("Curiosity".to_string()));
}

/// The markup of the one selected option label, if exactly one exists.
fn selected_label(html: &str) -> Option<&str> {
    let marker = "option-label selected";
    if html.matches(marker).count() != 1 {
        return None;
    }
    let start = html.find(marker)?;
    let end = html[start..].find("</label>")?;
    Some(&html[start..start + end])
}

#[tokio::test(flavor = "current_thread")]
async fn intro_renders_after_questions_load() {
    let harness = loaded(FakeSurveyApi::three_questions(Analysis::Report("# R"))).await;
    let html = harness.render();
    assert!(html.contains("3 questions"), "missing count in {html}");
    assert!(!html.contains("question-number"), "question shown early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn load_failure_renders_alert_without_controls() {
    let mut harness = setup_view_harness(FakeSurveyApi::unreachable());
    harness.rebuild();
    let html = harness
        .drive_until(|html| html.contains("Failed to load survey"))
        .await;
    assert!(
        html.contains("Failed to load survey. Please refresh the page and try again."),
        "missing alert in {html}"
    );
    assert!(!html.contains("start-btn"), "controls rendered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn first_question_shows_label_and_options() {
    let mut harness = loaded(FakeSurveyApi::three_questions(Analysis::Report("# R"))).await;
    harness.dispatch(SurveyIntent::Start);

    let html = harness.render();
    assert!(html.contains("Question 1 / 3"), "missing label in {html}");
    assert!(html.contains("A. Yes"), "missing option in {html}");
    assert!(html.contains("B. No"), "missing option in {html}");
    assert!(!html.contains("prev-btn"), "previous shown on first question in {html}");
    assert!(!html.contains("submit-btn"), "submit shown early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn selected_option_survives_rerender() {
    let mut harness = loaded(FakeSurveyApi::three_questions(Analysis::Report("# R"))).await;
    harness.dispatch(SurveyIntent::Start);
    harness.dispatch(SurveyIntent::SelectOption(OptionKey::new("A")));
    harness.dispatch(SurveyIntent::SelectOption(OptionKey::new("B")));

    let html = harness.render();
    let label = selected_label(&html).unwrap_or_else(|| panic!("one selection expected in {html}"));
    assert!(label.contains("B. No"), "wrong option selected: {label}");

    harness.dispatch(SurveyIntent::Next);
    harness.dispatch(SurveyIntent::Prev);
    let html = harness.render();
    assert!(html.contains("Question 1 / 3"), "not back on first question: {html}");
    let label = selected_label(&html).unwrap_or_else(|| panic!("one selection expected in {html}"));
    assert!(label.contains("B. No"), "selection lost: {label}");
}

#[tokio::test(flavor = "current_thread")]
async fn next_without_answer_warns_and_stays() {
    let mut harness = loaded(FakeSurveyApi::three_questions(Analysis::Report("# R"))).await;
    harness.dispatch(SurveyIntent::Start);
    harness.dispatch(SurveyIntent::Next);

    let html = harness.render();
    assert!(
        html.contains("Please answer the current question first"),
        "missing warning in {html}"
    );
    assert!(html.contains("Question 1 / 3"), "cursor moved in {html}");
    assert_eq!(harness.cursor(), Some(0));
}

#[tokio::test(flavor = "current_thread")]
async fn answered_survey_renders_markdown_report() {
    let mut harness = loaded(FakeSurveyApi::three_questions(Analysis::Report("# R"))).await;
    answer_all(&mut harness);

    let html = harness.render();
    assert!(html.contains("Question 3 / 3"), "not on last question: {html}");
    assert!(html.contains("submit-btn"), "submit hidden in {html}");

    harness.dispatch(SurveyIntent::Submit);
    let html = harness
        .drive_until(|html| html.contains("report-content"))
        .await;
    assert!(html.contains("<h1>R</h1>"), "report not rendered in {html}");
    assert!(!html.contains("loading-section"), "loading still shown in {html}");

    let submitted = harness.api.submitted();
    assert_eq!(submitted.len(), 1);
    let answers = &submitted[0];
    assert_eq!(answers.answered_count(), 3);
    assert_eq!(
        answers.get(&QuestionId::new("Q1")),
        Some(&AnswerValue::choice("A"))
    );
    assert_eq!(
        answers.get(&QuestionId::new("Q2")),
        Some(&AnswerValue::choice("B"))
    );
    assert_eq!(
        answers.get(&QuestionId::new("Q3")),
        Some(&AnswerValue::text("Curiosity"))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn backend_failure_alerts_and_returns_to_question() {
    let mut harness = loaded(FakeSurveyApi::three_questions(Analysis::Failure(
        500,
        "backend error",
    )))
    .await;
    answer_all(&mut harness);
    harness.dispatch(SurveyIntent::Submit);

    let html = harness
        .drive_until(|html| html.contains("backend error"))
        .await;
    assert!(
        html.contains("Failed to generate report: backend error"),
        "missing alert in {html}"
    );
    assert!(html.contains("Question 3 / 3"), "not back on question in {html}");
    assert!(!html.contains("loading-section"), "loading still shown in {html}");
    assert!(!html.contains("report-content"), "report shown in {html}");
    assert_eq!(harness.cursor(), Some(2));
}

#[tokio::test(flavor = "current_thread")]
async fn submission_shows_loading_bar_until_report() {
    let api = FakeSurveyApi::three_questions(Analysis::Report("# R"))
        .with_latency(Duration::from_millis(400));
    let progress = ProgressConfig::default()
        .with_duration(Duration::from_millis(200))
        .with_reveal_delay(Duration::from_millis(300));
    let mut harness = wait_for_intro(setup_view_harness_with_progress(api, progress)).await;
    answer_all(&mut harness);
    harness.dispatch(SurveyIntent::Submit);

    let html = harness
        .drive_until(|html| html.contains("loading-section"))
        .await;
    assert!(html.contains("loading-section"), "loading never shown: {html}");
    assert!(html.contains("loading-progress-fill"), "missing bar in {html}");
    assert!(!html.contains("question-number"), "question shown in {html}");
    assert!(!html.contains("submit-btn"), "submit shown in {html}");
    assert!(!html.contains("next-btn"), "next shown in {html}");
    assert!(!html.contains("prev-btn"), "previous shown in {html}");

    let html = harness
        .drive_until(|html| html.contains("width: 100%"))
        .await;
    assert!(
        html.contains("loading-section") && html.contains("width: 100%"),
        "bar never filled: {html}"
    );

    let html = harness
        .drive_until(|html| html.contains("report-content"))
        .await;
    assert!(html.contains("<h1>R</h1>"), "report not rendered in {html}");
    assert!(!html.contains("loading-section"), "loading still shown in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn retry_after_failure_clears_alert() {
    let api = FakeSurveyApi::three_questions(Analysis::Failure(500, "backend error"))
        .then(Analysis::Report("# R"))
        .with_latency(Duration::from_millis(300));
    let mut harness = loaded(api).await;
    answer_all(&mut harness);
    harness.dispatch(SurveyIntent::Submit);

    let html = harness
        .drive_until(|html| html.contains("backend error"))
        .await;
    assert!(html.contains("submit-btn"), "cannot retry from {html}");

    harness.dispatch(SurveyIntent::Submit);
    let html = harness
        .drive_until(|html| html.contains("loading-section"))
        .await;
    assert!(html.contains("loading-section"), "loading never shown: {html}");
    assert!(!html.contains("backend error"), "stale alert over loading: {html}");
    assert!(!html.contains("notice--alert"), "stale alert over loading: {html}");

    let html = harness
        .drive_until(|html| html.contains("report-content"))
        .await;
    assert!(html.contains("<h1>R</h1>"), "report not rendered in {html}");
    assert!(!html.contains("backend error"), "alert survived success: {html}");
    assert_eq!(harness.api.submitted().len(), 2);
}

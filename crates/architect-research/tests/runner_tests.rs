// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll-loop behavior of the research runner against scripted backends.

use std::sync::Arc;
use std::time::Duration;

use architect_config::model::GeminiConfig;
use architect_core::{JobSnapshot, ResearchOutcome, TaskRunner};
use architect_research::{CANCELLED, ResearchTaskRunner};
use architect_test_utils::ScriptedResearchBackend;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn runner(backend: Arc<ScriptedResearchBackend>, max_attempts: u32) -> ResearchTaskRunner {
    ResearchTaskRunner::new(backend, Duration::from_secs(5), max_attempts)
}

#[tokio::test(start_paused = true)]
async fn polls_until_completed() {
    let backend = Arc::new(ScriptedResearchBackend::new(vec![
        Ok(JobSnapshot::pending()),
        Ok(JobSnapshot::pending()),
        Ok(JobSnapshot::completed("## Architecture report")),
    ]));
    let started = Instant::now();

    let outcome = runner(backend.clone(), 0)
        .run("analyse", &CancellationToken::new())
        .await;

    assert_eq!(outcome, ResearchOutcome::Success("## Architecture report".into()));
    assert_eq!(backend.poll_count(), 3);
    assert_eq!(backend.submitted_prompts().await, vec!["analyse"]);
    assert!(started.elapsed() >= Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn submit_failure_is_reported_as_api_error() {
    let backend = Arc::new(ScriptedResearchBackend::failing_submit("invalid API key"));

    let outcome = runner(backend.clone(), 0)
        .run("analyse", &CancellationToken::new())
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.text().contains("Gemini API Error"), "got: {}", outcome.text());
    assert!(outcome.text().contains("invalid API key"));
    assert_eq!(backend.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_job_carries_detail() {
    let backend = Arc::new(ScriptedResearchBackend::new(vec![
        Ok(JobSnapshot::pending()),
        Ok(JobSnapshot::failed("rate limited")),
    ]));

    let outcome = runner(backend, 0)
        .run("analyse", &CancellationToken::new())
        .await;

    assert_eq!(outcome, ResearchOutcome::Failure("Research Error: rate limited".into()));
}

#[tokio::test(start_paused = true)]
async fn poll_error_stops_the_loop() {
    let backend = Arc::new(ScriptedResearchBackend::new(vec![
        Ok(JobSnapshot::pending()),
        Err("HTTP request failed: connection reset".into()),
        Ok(JobSnapshot::completed("never seen")),
    ]));

    let outcome = runner(backend.clone(), 0)
        .run("analyse", &CancellationToken::new())
        .await;

    assert_eq!(
        outcome.text(),
        "Gemini API Error: HTTP request failed: connection reset"
    );
    assert_eq!(backend.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn attempt_cap_times_out() {
    let backend = Arc::new(ScriptedResearchBackend::never_finishing());

    let outcome = runner(backend.clone(), 3)
        .run("analyse", &CancellationToken::new())
        .await;

    assert_eq!(outcome.text(), "Research Error: timed out after 3 polls");
    assert_eq!(backend.poll_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_polling() {
    let backend = Arc::new(ScriptedResearchBackend::never_finishing());
    let runner = Arc::new(runner(backend.clone(), 0));
    let cancel = CancellationToken::new();

    let task = tokio::spawn({
        let runner = runner.clone();
        let cancel = cancel.clone();
        async move { runner.run("analyse", &cancel).await }
    });

    tokio::time::sleep(Duration::from_secs(12)).await;
    cancel.cancel();
    let outcome = task.await.unwrap();

    assert_eq!(outcome, ResearchOutcome::Failure(CANCELLED.into()));
    let polls = backend.poll_count();
    assert!(polls <= 3, "polled {polls} times");

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(backend.poll_count(), polls);
}

#[tokio::test(start_paused = true)]
async fn already_cancelled_never_submits() {
    let backend = Arc::new(ScriptedResearchBackend::completing("x"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = runner(backend.clone(), 0).run("analyse", &cancel).await;

    assert_eq!(outcome.text(), CANCELLED);
    assert!(backend.submitted_prompts().await.is_empty());
}

#[test]
fn from_config_uses_gemini_section() {
    let config = GeminiConfig {
        poll_interval_secs: 2,
        max_poll_attempts: 10,
        ..GeminiConfig::default()
    };
    let runner = ResearchTaskRunner::from_config(
        Arc::new(ScriptedResearchBackend::never_finishing()),
        &config,
    );
    assert_eq!(runner.poll_interval(), Duration::from_secs(2));
    assert_eq!(runner.max_attempts(), 10);
}

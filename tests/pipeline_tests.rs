//! End-to-end pipeline tests against a fake scraping executable (a shell
//! script that stands in for the real binary).

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{Map, Value, json};

use scraper_bridge::classify::classify;
use scraper_bridge::config::ServerConfig;
use scraper_bridge::invoke::{Invoker, ProcessOutcome};
use scraper_bridge::pipeline::ScraperPipeline;
use scraper_bridge::registry::Task;

fn fake_scraper(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("scraper.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn params(entries: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (name, value) in entries {
        map.insert((*name).to_string(), value.clone());
    }
    map
}

#[tokio::test]
async fn successful_run_returns_unwrapped_payload() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(
        dir.path(),
        r#"echo '{"status":"success","task_output_data":{"ok":true}}'"#,
    );
    let pipeline = ScraperPipeline::new(&ServerConfig::new(exe, 3001).unwrap());

    let reply = pipeline
        .run(
            Task::Crawl,
            &params(&[
                ("url", json!("https://example.com")),
                ("selector", json!("a")),
            ]),
        )
        .await;

    assert!(!reply.is_error, "unexpected error: {}", reply.text);
    assert_eq!(reply.text, r#"{"ok":true}"#);
}

#[tokio::test]
async fn executable_receives_preamble_and_translated_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(
        dir.path(),
        r#"printf '{"status":"success","task_output_data":{"argv":"%s"}}' "$*""#,
    );
    let pipeline = ScraperPipeline::new(&ServerConfig::new(exe, 3001).unwrap());

    let reply = pipeline
        .run(
            Task::Crawl,
            &params(&[
                ("url", json!("https://example.com")),
                ("headless_mode", json!(true)),
            ]),
        )
        .await;

    assert!(!reply.is_error, "unexpected error: {}", reply.text);
    assert!(reply.text.contains("--task crawl --output-stdout-json"));
    assert!(reply.text.contains("--url https://example.com"));
    assert!(reply.text.contains("--headless"));
}

#[tokio::test]
async fn subprocess_runs_in_the_executables_own_directory() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(
        dir.path(),
        r#"printf '{"status":"success","task_output_data":{"cwd":"%s"}}' "$PWD""#,
    );
    let pipeline = ScraperPipeline::new(&ServerConfig::new(exe, 3001).unwrap());

    let reply = pipeline.run(Task::GoogleAi, &params(&[])).await;

    assert!(!reply.is_error, "unexpected error: {}", reply.text);
    let expected = dir.path().canonicalize().unwrap();
    assert!(
        reply.text.contains(expected.to_str().unwrap()),
        "cwd reply {} should name {}",
        reply.text,
        expected.display()
    );
}

#[tokio::test]
async fn nonzero_exit_surfaces_code_and_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(dir.path(), "echo 'boom' >&2\nexit 3");
    let pipeline = ScraperPipeline::new(&ServerConfig::new(exe, 3001).unwrap());

    let reply = pipeline.run(Task::Crawl, &params(&[])).await;

    assert!(reply.is_error);
    assert!(reply.text.contains("crawl"));
    assert!(reply.text.contains("code 3"));
    assert!(reply.text.contains("boom"));
}

#[tokio::test]
async fn timeout_kills_the_subprocess_and_keeps_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(dir.path(), "echo 'partial line'\nsleep 30");
    let config = ServerConfig::new(&exe, 3001).unwrap();
    let invoker = Invoker::new(&config).with_timeout(Duration::from_millis(300));

    let args = vec!["--task".to_string(), "crawl".to_string()];
    let outcome = invoker.run(&args).await;

    match &outcome {
        ProcessOutcome::TimedOut { captured, .. } => {
            let stdout = String::from_utf8_lossy(&captured.stdout);
            assert!(stdout.contains("partial line"));
        }
        other => panic!("expected timeout, got {other:?}"),
    }

    let reply = classify("crawl", &outcome);
    assert!(reply.is_error);
    assert!(reply.text.contains("crawl"));
    assert!(reply.text.contains("timed out"));
}

#[tokio::test]
async fn timeout_through_the_pipeline_is_an_error_reply() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(dir.path(), "sleep 30");
    let config = ServerConfig::new(&exe, 3001).unwrap();
    let pipeline = ScraperPipeline::new(&config)
        .with_invoker(Invoker::new(&config).with_timeout(Duration::from_millis(200)));

    let reply = pipeline.run(Task::GoogleSearch, &params(&[])).await;

    assert!(reply.is_error);
    assert!(reply.text.contains("google_search"));
    assert!(reply.text.contains("timed out"));
}

#[tokio::test]
async fn missing_executable_is_a_spawn_failure_reply() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline =
        ScraperPipeline::new(&ServerConfig::new(dir.path().join("missing.sh"), 3001).unwrap());

    let reply = pipeline.run(Task::Crawl, &params(&[])).await;

    assert!(reply.is_error);
    assert!(reply.text.contains("crawl"));
    assert!(reply.text.contains("Failed to start"));
}

#[tokio::test]
async fn empty_output_from_executable_is_an_error_reply() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(dir.path(), "exit 0");
    let pipeline = ScraperPipeline::new(&ServerConfig::new(exe, 3001).unwrap());

    let reply = pipeline.run(Task::LawScraper, &params(&[])).await;

    assert!(reply.is_error);
    assert!(reply.text.contains("law_scraper"));
    assert!(reply.text.contains("no output"));
}

#[tokio::test]
async fn concurrent_invocations_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let exe = fake_scraper(
        dir.path(),
        r#"printf '{"status":"success","task_output_data":{"echo":"%s"}}' "$5""#,
    );
    let pipeline =
        std::sync::Arc::new(ScraperPipeline::new(&ServerConfig::new(exe, 3001).unwrap()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let reply = pipeline
                .run(
                    Task::Crawl,
                    &params(&[("url", json!(format!("https://example.com/{i}")))]),
                )
                .await;
            (i, reply)
        }));
    }

    for handle in handles {
        let (i, reply) = handle.await.unwrap();
        assert!(!reply.is_error, "run {i} failed: {}", reply.text);
        assert!(reply.text.contains(&format!("https://example.com/{i}")));
    }
}

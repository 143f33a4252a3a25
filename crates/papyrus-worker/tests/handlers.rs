mod support;

use std::io::Cursor;
use std::time::Duration;

use docx_rs::{Docx, Paragraph, Run};
use papyrus_core::models::outcome::JobOutcome;
use papyrus_core::models::request::Job;
use papyrus_core::models::status::Status;
use papyrus_storage::store::MemoryStore;
use papyrus_worker::handlers;
use papyrus_worker::queue;

use support::{STORY, state};

fn error_message(outcome: &JobOutcome) -> String {
    assert_eq!(outcome.status, Status::Error);
    outcome.callback_body()["message"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn scrape_returns_best_sentences() {
    let store = MemoryStore::new();
    store.insert("docs/story.txt", STORY).await;
    let state = state(store);

    let outcome = handlers::file_scraper(
        &state.store,
        &state.scraper,
        "docs/story.txt",
        vec!["cat".to_string(), "dog".to_string()],
        Duration::from_secs(5),
    )
    .await;

    assert_eq!(
        outcome,
        JobOutcome::scraped(vec!["The cat sat.".to_string(), "The Dog Ran!".to_string()])
    );
    assert_eq!(outcome.callback_body()["count"], 2);
}

#[tokio::test]
async fn scrape_reads_word_documents() {
    let mut buf = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Minutes of the meeting.")))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("The budget was approved. Lunch followed.")))
        .build()
        .pack(&mut buf)
        .unwrap();

    let store = MemoryStore::new();
    store.insert("minutes.DOCX", buf.into_inner()).await;
    let state = state(store);

    let outcome = handlers::run_job(
        &state,
        Job::Scrape {
            s3_key: "minutes.DOCX".to_string(),
            keywords: vec!["budget".to_string()],
        },
    )
    .await;

    assert_eq!(outcome, JobOutcome::scraped(vec!["The budget was approved.".to_string()]));
}

#[tokio::test]
async fn scrape_with_no_match_is_an_empty_success() {
    let store = MemoryStore::new();
    store.insert("story.txt", STORY).await;
    let state = state(store);

    let outcome = handlers::run_job(
        &state,
        Job::Scrape {
            s3_key: "story.txt".to_string(),
            keywords: vec!["xyz123".to_string()],
        },
    )
    .await;

    assert_eq!(outcome, JobOutcome::scraped(Vec::new()));
}

#[tokio::test]
async fn missing_object_is_an_error_outcome() {
    let state = state(MemoryStore::new());

    let outcome = handlers::run_job(
        &state,
        Job::Scrape {
            s3_key: "nowhere.txt".to_string(),
            keywords: vec!["dog".to_string()],
        },
    )
    .await;

    assert!(error_message(&outcome).contains("nowhere.txt"));
}

#[tokio::test]
async fn empty_object_is_an_error_outcome() {
    let store = MemoryStore::new();
    store.insert("empty.txt", Vec::<u8>::new()).await;
    let state = state(store);

    let outcome = handlers::run_job(
        &state,
        Job::Scrape {
            s3_key: "empty.txt".to_string(),
            keywords: vec!["dog".to_string()],
        },
    )
    .await;

    assert!(error_message(&outcome).contains("missing or empty"));
}

#[tokio::test]
async fn unsupported_extension_is_reported() {
    let store = MemoryStore::new();
    store.insert("sheet.xlsx", "a,b,c").await;
    let state = state(store);

    let outcome = handlers::run_job(
        &state,
        Job::Scrape {
            s3_key: "sheet.xlsx".to_string(),
            keywords: vec!["a".to_string()],
        },
    )
    .await;

    assert!(error_message(&outcome).starts_with("Unsupported file format"));
}

#[tokio::test]
async fn corrupt_document_is_reported() {
    let store = MemoryStore::new();
    store.insert("broken.docx", "definitely not a zip").await;
    let state = state(store);

    let outcome = handlers::run_job(
        &state,
        Job::Scrape {
            s3_key: "broken.docx".to_string(),
            keywords: vec!["zip".to_string()],
        },
    )
    .await;

    assert!(error_message(&outcome).starts_with("Corrupt input"));
}

#[tokio::test]
async fn scrape_past_its_deadline_is_an_internal_error() {
    let long: String = (0..20_000)
        .map(|i| format!("Entry {i} records the harbour tide and the keeper's lamp. "))
        .collect();
    let store = MemoryStore::new();
    store.insert("log.txt", long).await;
    store.insert("story.txt", STORY).await;
    let state = state(store);

    let outcome = handlers::file_scraper(
        &state.store,
        &state.scraper,
        "log.txt",
        vec!["lighthouse".to_string(), "harbor".to_string()],
        Duration::from_millis(1),
    )
    .await;
    assert_eq!(error_message(&outcome), "Internal error: timed out");

    // The abandoned run does not keep the scraper busy.
    let outcome = handlers::file_scraper(
        &state.store,
        &state.scraper,
        "story.txt",
        vec!["bird".to_string()],
        Duration::from_secs(5),
    )
    .await;
    assert_eq!(outcome, JobOutcome::scraped(vec!["A bird FLEW.".to_string()]));
}

#[tokio::test]
async fn conversion_to_unknown_format_is_reported() {
    let store = MemoryStore::new();
    store.insert("report.docx", "bytes").await;
    let state = state(store.clone());

    let outcome = handlers::run_job(
        &state,
        Job::Convert {
            s3_key: "report.docx".to_string(),
            format_from: "docx".to_string(),
            format_to: "xlsx".to_string(),
        },
    )
    .await;

    assert!(error_message(&outcome).starts_with("Unsupported file format"));
    assert!(store.get("report.xlsx").await.is_none());
}

#[tokio::test]
async fn conversion_without_a_converter_is_an_internal_error() {
    let store = MemoryStore::new();
    store.insert("report.docx", "bytes").await;
    let state = state(store.clone());

    let outcome = handlers::convert_file(&state.store, &state.converter, "report.docx", "docx", "pdf").await;

    assert!(error_message(&outcome).starts_with("Internal error"));
    assert!(store.get("report.pdf").await.is_none());
}

#[tokio::test]
async fn conversion_of_a_missing_object_is_reported() {
    let state = state(MemoryStore::new());

    let outcome = handlers::convert_file(&state.store, &state.converter, "gone.docx", "docx", "pdf").await;

    assert!(error_message(&outcome).contains("gone.docx"));
}

#[tokio::test]
async fn queue_message_with_keywords_runs_a_scrape() {
    let store = MemoryStore::new();
    store.insert("story.txt", STORY).await;
    let state = state(store);

    let body = r#"{"s3_key":"story.txt","callback_url":"http://caller/hook","keywords":["dog"]}"#;
    let reply = queue::process_body(&state, body).await.unwrap();

    assert_eq!(reply.callback_url, "http://caller/hook");
    assert_eq!(reply.outcome, JobOutcome::scraped(vec!["The Dog Ran!".to_string()]));
}

#[tokio::test]
async fn queue_message_without_a_job_gets_an_error_reply() {
    let state = state(MemoryStore::new());

    let body = r#"{"s3_key":"story.txt","callback_url":"http://caller/hook","keywords":[]}"#;
    let reply = queue::process_body(&state, body).await.unwrap();

    assert!(error_message(&reply.outcome).starts_with("Invalid message"));
}

#[tokio::test]
async fn queue_message_without_callback_or_json_is_dropped() {
    let state = state(MemoryStore::new());

    assert!(queue::process_body(&state, "not json").await.is_none());
    assert!(
        queue::process_body(&state, r#"{"s3_key":"story.txt","keywords":["dog"]}"#)
            .await
            .is_none()
    );
}

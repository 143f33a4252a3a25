#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use papyrus_storage::store::MemoryStore;
use papyrus_worker::config::Settings;
use papyrus_worker::state::AppState;
use serde_json::Value;

pub const STORY: &str = "The cat sat. The Dog Ran! A bird FLEW.";

pub fn settings() -> Settings {
    Settings {
        max_workers: 2,
        scrape_timeout: Duration::from_secs(10),
        callback_timeout: Duration::from_secs(5),
        office_converter: "papyrus-no-such-converter".to_string(),
        pdf_converter: "papyrus-no-such-converter".to_string(),
        ..Settings::default()
    }
}

pub fn state(store: MemoryStore) -> AppState<MemoryStore> {
    AppState::new(store, settings()).unwrap()
}

/// A local HTTP endpoint that records every JSON body posted to `/hook`.
pub struct Receiver {
    pub url: String,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Receiver {
    pub async fn start(answer: StatusCode) -> Self {
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&bodies);
        let app = Router::new().route(
            "/hook",
            post(move |Json(body): Json<Value>| {
                let recorded = Arc::clone(&recorded);
                async move {
                    recorded.lock().unwrap().push(body);
                    answer
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/hook"),
            bodies,
        }
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

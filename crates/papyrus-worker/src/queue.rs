//! SQS long-polling loop.
//!
//! Each received message is handled on its own task. A message is deleted
//! once it has been handled, whatever the outcome, so every message yields
//! exactly one callback.

use std::future::Future;
use std::time::Duration;

use aws_sdk_sqs::Client;
use aws_sdk_sqs::types::Message;
use papyrus_core::models::outcome::JobOutcome;
use papyrus_core::models::request::QueueMessage;
use papyrus_storage::store::ObjectStore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::callback;
use crate::handlers;
use crate::state::AppState;

const MAX_MESSAGES: i32 = 10;
const WAIT_TIME_SECS: i32 = 20;
const VISIBILITY_TIMEOUT_SECS: i32 = 30;
const IDLE_SLEEP: Duration = Duration::from_millis(500);

/// Where to send a job's result, and the result itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub callback_url: String,
    pub outcome: JobOutcome,
}

pub struct QueuePoller<S> {
    sqs: Client,
    queue_url: String,
    state: AppState<S>,
}

impl<S: ObjectStore + Clone> QueuePoller<S> {
    pub fn new(sqs: Client, queue_url: impl Into<String>, state: AppState<S>) -> Self {
        Self {
            sqs,
            queue_url: queue_url.into(),
            state,
        }
    }

    /// Poll until `shutdown` resolves. Messages of an interrupted batch are
    /// not deleted and reappear after the visibility timeout.
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        info!(queue_url = %self.queue_url, "queue poller started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                polled = self.poll_once() => match polled {
                    Ok(0) => tokio::time::sleep(IDLE_SLEEP).await,
                    Ok(n) => debug!(messages = n, "batch handled"),
                    Err(e) => {
                        error!(error = %e, "receive failed");
                        tokio::time::sleep(IDLE_SLEEP).await;
                    }
                },
            }
        }

        info!("queue poller stopped");
    }

    /// Receive one batch and handle every message in it concurrently.
    async fn poll_once(&self) -> eyre::Result<usize> {
        let received = self
            .sqs
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(MAX_MESSAGES)
            .wait_time_seconds(WAIT_TIME_SECS)
            .visibility_timeout(VISIBILITY_TIMEOUT_SECS)
            .send()
            .await?;

        let messages = received.messages.unwrap_or_default();
        let count = messages.len();

        let mut tasks = JoinSet::new();
        for message in messages {
            let state = self.state.clone();
            let sqs = self.sqs.clone();
            let queue_url = self.queue_url.clone();
            tasks.spawn(async move {
                handle_message(&state, &message).await;
                delete_message(&sqs, &queue_url, &message).await;
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "message task failed");
            }
        }

        Ok(count)
    }
}

async fn handle_message<S: ObjectStore>(state: &AppState<S>, message: &Message) {
    let Some(body) = message.body() else {
        warn!(message_id = ?message.message_id(), "message has no body");
        return;
    };
    if let Some(reply) = process_body(state, body).await {
        callback::deliver(&state.http, &reply.callback_url, &reply.outcome).await;
    }
}

async fn delete_message(sqs: &Client, queue_url: &str, message: &Message) {
    let Some(receipt) = message.receipt_handle() else {
        return;
    };
    if let Err(e) = sqs
        .delete_message()
        .queue_url(queue_url)
        .receipt_handle(receipt)
        .send()
        .await
    {
        error!(message_id = ?message.message_id(), error = %e, "failed to delete message");
    }
}

/// Parse a queue message and run the job it describes.
///
/// Returns `None` when there is nowhere to send a result: the body is not
/// JSON or carries no callback URL. A message that names no usable job
/// still gets an error reply.
pub async fn process_body<S: ObjectStore>(state: &AppState<S>, body: &str) -> Option<Reply> {
    let message = match QueueMessage::from_json(body) {
        Ok(message) => message,
        Err(e) => {
            error!(error = %e, "unreadable queue message");
            return None;
        }
    };

    let Some(callback_url) = message.callback_url.clone().filter(|u| !u.trim().is_empty()) else {
        error!(s3_key = ?message.s3_key, "queue message has no callback_url");
        return None;
    };

    let outcome = match message.into_job() {
        Ok(job) => handlers::run_job(state, job).await,
        Err(e) => {
            warn!(error = %e, "queue message rejected");
            JobOutcome::error(format!("Invalid message: {e}"))
        }
    };

    Some(Reply {
        callback_url,
        outcome,
    })
}

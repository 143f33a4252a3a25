use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::status::Status;

/// Sentences found by a scrape, with their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub count: usize,
    pub sentences: Vec<String>,
}

impl ScrapeResult {
    pub fn new(sentences: Vec<String>) -> Self {
        Self {
            count: sentences.len(),
            sentences,
        }
    }
}

/// Where a converted document ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub file_url: String,
    pub new_s3_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Scrape(ScrapeResult),
    Conversion(ConversionResult),
    Error(ErrorPayload),
}

/// The single terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub status: Status,
    pub payload: Payload,
}

impl JobOutcome {
    pub fn scraped(sentences: Vec<String>) -> Self {
        Self {
            status: Status::Success,
            payload: Payload::Scrape(ScrapeResult::new(sentences)),
        }
    }

    pub fn converted(file_url: String, new_s3_key: String) -> Self {
        Self {
            status: Status::Success,
            payload: Payload::Conversion(ConversionResult {
                file_url,
                new_s3_key,
            }),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            payload: Payload::Error(ErrorPayload {
                message: message.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// JSON body posted to the caller: the payload fields plus `status`.
    pub fn callback_body(&self) -> Value {
        let mut body = match serde_json::to_value(&self.payload) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        body.insert(
            "status".to_string(),
            Value::String(self.status.as_str().to_string()),
        );
        Value::Object(body)
    }
}

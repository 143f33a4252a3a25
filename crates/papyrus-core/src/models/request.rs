use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Body of `POST /api/v1/converter/convert-file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertFileRequest {
    pub s3_key: String,
    pub format_from: String,
    pub format_to: String,
    pub callback_url: String,
}

/// Body of `POST /api/v1/parser/parse-file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFileRequest {
    pub s3_key: String,
    pub keywords: Vec<String>,
    pub callback_url: String,
}

/// A job pulled off the work queue.
///
/// The queue carries one loosely-shaped message for both operations; which
/// one runs is decided by [`QueueMessage::into_job`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueMessage {
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub format_from: Option<String>,
    #[serde(default)]
    pub format_to: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// The operation a request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Convert {
        s3_key: String,
        format_from: String,
        format_to: String,
    },
    Scrape {
        s3_key: String,
        keywords: Vec<String>,
    },
}

impl QueueMessage {
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Conversion wins when both formats are present; scraping needs a
    /// non-empty keyword list.
    pub fn into_job(self) -> Result<Job, CoreError> {
        let s3_key = self
            .s3_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CoreError::MissingField("s3_key".to_string()))?;

        if let (Some(format_from), Some(format_to)) = (self.format_from, self.format_to) {
            return Ok(Job::Convert {
                s3_key,
                format_from,
                format_to,
            });
        }

        match self.keywords {
            Some(keywords) if !keywords.is_empty() => Ok(Job::Scrape { s3_key, keywords }),
            _ => Err(CoreError::MissingField(
                "format_from/format_to or keywords".to_string(),
            )),
        }
    }
}

impl From<ConvertFileRequest> for Job {
    fn from(req: ConvertFileRequest) -> Self {
        Job::Convert {
            s3_key: req.s3_key,
            format_from: req.format_from,
            format_to: req.format_to,
        }
    }
}

impl From<ParseFileRequest> for Job {
    fn from(req: ParseFileRequest) -> Self {
        Job::Scrape {
            s3_key: req.s3_key,
            keywords: req.keywords,
        }
    }
}

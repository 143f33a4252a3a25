//! Job handlers. Each one turns a request into exactly one [`JobOutcome`];
//! failures never escape as errors.

use std::time::Duration;

use papyrus_convert::Converter;
use papyrus_core::format::{self, FileFormat};
use papyrus_core::keys;
use papyrus_core::models::outcome::JobOutcome;
use papyrus_core::models::request::Job;
use papyrus_scraper::{ScrapeError, ScrapeJob, Scraper};
use papyrus_storage::store::ObjectStore;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::error::JobError;
use crate::state::AppState;

/// Run whichever operation `job` asks for.
pub async fn run_job<S: ObjectStore>(state: &AppState<S>, job: Job) -> JobOutcome {
    let job_id = Uuid::new_v4();
    match job {
        Job::Convert {
            s3_key,
            format_from,
            format_to,
        } => {
            let span = info_span!("convert", %job_id, s3_key = %s3_key);
            convert_file(&state.store, &state.converter, &s3_key, &format_from, &format_to)
                .instrument(span)
                .await
        }
        Job::Scrape { s3_key, keywords } => {
            let span = info_span!("scrape", %job_id, s3_key = %s3_key);
            file_scraper(
                &state.store,
                &state.scraper,
                &s3_key,
                keywords,
                state.settings.scrape_timeout,
            )
            .instrument(span)
            .await
        }
    }
}

/// Fetch a document, convert it and store the result next to the original.
pub async fn convert_file<S: ObjectStore>(
    store: &S,
    converter: &Converter,
    s3_key: &str,
    format_from: &str,
    format_to: &str,
) -> JobOutcome {
    let result = async {
        let new_key = keys::converted_key(s3_key, format_from, format_to);
        let bytes = store.fetch(s3_key).await?;
        let converted = converter.convert(&bytes, format_from, format_to).await?;
        let content_type = format::content_type_for_extension(format_to.trim_start_matches('.'));
        store.store(&new_key, converted, content_type).await?;
        let file_url = store.url(&new_key).await?;
        Ok::<_, JobError>((file_url, new_key))
    }
    .await;

    match result {
        Ok((file_url, new_key)) => {
            info!(new_s3_key = %new_key, "conversion finished");
            JobOutcome::converted(file_url, new_key)
        }
        Err(e) => {
            error!(error = %e, "conversion failed");
            JobOutcome::error(e.to_string())
        }
    }
}

/// Fetch a document and return its best keyword-matching sentences.
pub async fn file_scraper<S: ObjectStore>(
    store: &S,
    scraper: &Scraper,
    s3_key: &str,
    keywords: Vec<String>,
    timeout: Duration,
) -> JobOutcome {
    let result = async {
        let format = FileFormat::from_key(s3_key)?;
        let bytes = store.fetch(s3_key).await?;
        let job = ScrapeJob {
            bytes,
            format,
            keywords,
        };
        let matches = tokio::time::timeout(timeout, scraper.run(job))
            .await
            .map_err(|_| ScrapeError::Internal("timed out".to_string()))??;
        Ok::<_, JobError>(matches.sentences)
    }
    .await;

    match result {
        Ok(sentences) => {
            info!(count = sentences.len(), "scrape finished");
            JobOutcome::scraped(sentences)
        }
        Err(e) => {
            error!(error = %e, "scrape failed");
            JobOutcome::error(e.to_string())
        }
    }
}

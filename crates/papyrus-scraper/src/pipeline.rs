//! Extract → segment → score → select.
//!
//! A [`Scraper`] is long-lived and owns the worker pool. Each call to
//! [`Scraper::run`] consumes a [`ScrapeJob`], so a keyword set lives for
//! exactly one run and is shared read-only between that run's tasks.

use std::sync::Arc;

use papyrus_core::format::FileFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::extract;
use crate::pool::{Cancellation, WorkerPool};
use crate::score::{DEFAULT_THRESHOLD, KeywordScorer, MatchPolicy};
use crate::segment;
use crate::select::{self, SentenceScores};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Minimum similarity (0–100) for a word to count as a keyword hit.
    pub threshold: f64,
    pub policy: MatchPolicy,
    /// Upper bound on concurrently running extraction/scoring jobs.
    pub max_workers: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            policy: MatchPolicy::Count,
            max_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

/// One document and the keywords to look for in it.
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub bytes: Vec<u8>,
    pub format: FileFormat,
    pub keywords: Vec<String>,
}

/// Best-scoring sentences of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    pub sentences: Vec<String>,
    /// Score shared by every returned sentence; 0 when nothing matched.
    pub score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Extracting,
    Scoring,
    Completed,
}

#[derive(Clone)]
pub struct Scraper {
    config: ScraperConfig,
    pool: WorkerPool,
}

impl Scraper {
    pub fn new(config: ScraperConfig) -> Self {
        let pool = WorkerPool::new(config.max_workers);
        Self { config, pool }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Run the whole pipeline over one document.
    ///
    /// Either every segment is extracted and scored, or the run fails with
    /// no partial result. Dropping the returned future cancels the run.
    pub async fn run(&self, job: ScrapeJob) -> Result<Matches, ScrapeError> {
        let ScrapeJob {
            bytes,
            format,
            keywords,
        } = job;
        let scorer = Arc::new(KeywordScorer::new(
            keywords,
            self.config.threshold,
            self.config.policy,
        ));

        debug!(stage = ?Stage::Extracting, format = ?format, size = bytes.len(), "scrape started");
        let segments = extract::extract(bytes, format, &self.pool).await?;

        debug!(stage = ?Stage::Scoring, segments = segments.len(), keywords = scorer.keywords().len());
        let scores = self.score_segments(segments, &scorer).await?;

        let sentences = select::select(&scores);
        let score = scores.max_score();

        debug!(stage = ?Stage::Completed);
        info!(
            matched = scores.len(),
            selected = sentences.len(),
            max_score = score,
            "scrape complete"
        );

        Ok(Matches { sentences, score })
    }

    /// Score every segment on the pool and merge the results in segment order.
    async fn score_segments(
        &self,
        segments: Vec<String>,
        scorer: &Arc<KeywordScorer>,
    ) -> Result<SentenceScores, ScrapeError> {
        if scorer.is_empty() || segments.is_empty() {
            return Ok(SentenceScores::new());
        }

        let jobs: Vec<_> = segments
            .into_iter()
            .map(|text| {
                let scorer = Arc::clone(scorer);
                move |cancel: &Cancellation| score_segment(&text, &scorer, cancel)
            })
            .collect();

        let mut merged = SentenceScores::new();
        for scores in self.pool.run_all(jobs).await? {
            merged.merge(scores);
        }
        Ok(merged)
    }
}

/// Scores of the sentences of a single segment.
///
/// Stops between sentences once `cancel` is raised.
pub fn score_segment(
    text: &str,
    scorer: &KeywordScorer,
    cancel: &Cancellation,
) -> Result<SentenceScores, ScrapeError> {
    segment::segment(text)
        .into_iter()
        .map(|sentence| {
            cancel.check()?;
            let score = scorer.score(&sentence);
            Ok((sentence, score))
        })
        .collect()
}

//! papyrus-scraper
//!
//! Keyword-bearing sentence extraction. Pulls text out of plain text, DOCX
//! and PDF documents, splits it into sentences, fuzzy-scores each sentence
//! against a keyword set and keeps the best-scoring ones.

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod pool;
pub mod score;
pub mod segment;
pub mod select;

pub use error::ScrapeError;
pub use pipeline::{Matches, ScrapeJob, Scraper, ScraperConfig};
pub use score::{KeywordScorer, MatchPolicy};

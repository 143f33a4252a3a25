//! Text extraction, one segment per paragraph (DOCX), page (PDF) or file
//! (plain text).
//!
//! Extraction is all-or-nothing: any unreadable paragraph or page fails the
//! whole document.

use std::sync::Arc;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use lopdf::Document as PdfDocument;
use papyrus_core::format::FileFormat;
use tracing::debug;

use crate::error::ScrapeError;
use crate::pool::{Cancellation, WorkerPool};

/// Extract the text segments of a document, in document order.
pub async fn extract(
    bytes: Vec<u8>,
    format: FileFormat,
    pool: &WorkerPool,
) -> Result<Vec<String>, ScrapeError> {
    let segments = match format {
        FileFormat::Text => vec![text_segment(bytes)?],
        FileFormat::WordProcessor => {
            pool.run(move |_: &Cancellation| docx_paragraphs(&bytes))
                .await?
        }
        FileFormat::Pdf => pdf_pages(bytes, pool).await?,
    };

    debug!(format = ?format, segments = segments.len(), "text extracted");
    Ok(segments)
}

/// The whole file as one segment. Must be UTF-8.
pub fn text_segment(bytes: Vec<u8>) -> Result<String, ScrapeError> {
    String::from_utf8(bytes)
        .map_err(|e| ScrapeError::CorruptInput(format!("text is not valid UTF-8: {e}")))
}

/// Non-blank top-level body paragraphs of a DOCX document.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, ScrapeError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| ScrapeError::CorruptInput(format!("unreadable DOCX: {e}")))?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(&paragraph.children)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs)
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}

/// Text of every PDF page, in page order.
///
/// The document is parsed once; pages are then extracted concurrently on
/// the pool and reassembled by page index. A page job does not start once
/// the run is cancelled.
pub async fn pdf_pages(bytes: Vec<u8>, pool: &WorkerPool) -> Result<Vec<String>, ScrapeError> {
    let document = pool
        .run(move |_: &Cancellation| {
            PdfDocument::load_mem(&bytes)
                .map_err(|e| ScrapeError::CorruptInput(format!("unreadable PDF: {e}")))
        })
        .await?;
    let document = Arc::new(document);

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    debug!(pages = page_numbers.len(), "PDF loaded");

    let jobs: Vec<_> = page_numbers
        .into_iter()
        .map(|page| {
            let document = Arc::clone(&document);
            move |cancel: &Cancellation| {
                cancel.check()?;
                document.extract_text(&[page]).map_err(|e| {
                    ScrapeError::CorruptInput(format!("unreadable PDF page {page}: {e}"))
                })
            }
        })
        .collect();

    pool.run_all(jobs).await
}

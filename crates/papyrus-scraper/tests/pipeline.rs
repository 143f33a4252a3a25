use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use papyrus_core::format::FileFormat;
use papyrus_scraper::error::ScrapeError;
use papyrus_scraper::{MatchPolicy, ScrapeJob, Scraper, ScraperConfig};

const STORY: &str = "The cat sat. The Dog Ran! A bird FLEW.";

fn scraper(policy: MatchPolicy) -> Scraper {
    Scraper::new(ScraperConfig {
        threshold: 80.0,
        policy,
        max_workers: 4,
    })
}

fn job(bytes: impl Into<Vec<u8>>, format: FileFormat, keywords: &[&str]) -> ScrapeJob {
    ScrapeJob {
        bytes: bytes.into(),
        format,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let mut doc = Docx::new();
    for text in paragraphs {
        doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
    }
    let mut buf = Cursor::new(Vec::new());
    doc.build().pack(&mut buf).unwrap();
    buf.into_inner()
}

fn pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[tokio::test]
async fn single_keyword_returns_the_matching_sentence() {
    let matches = scraper(MatchPolicy::Count)
        .run(job(STORY, FileFormat::Text, &["dog"]))
        .await
        .unwrap();

    assert_eq!(matches.sentences, vec!["The Dog Ran!"]);
    assert_eq!(matches.score, 1);
}

#[tokio::test]
async fn tied_sentences_are_all_returned() {
    let matches = scraper(MatchPolicy::Count)
        .run(job(STORY, FileFormat::Text, &["cat", "dog"]))
        .await
        .unwrap();

    assert_eq!(matches.sentences, vec!["The cat sat.", "The Dog Ran!"]);
    assert_eq!(matches.score, 1);
}

#[tokio::test]
async fn no_fuzzy_match_yields_empty_result() {
    let matches = scraper(MatchPolicy::Count)
        .run(job(STORY, FileFormat::Text, &["xyz123"]))
        .await
        .unwrap();

    assert!(matches.sentences.is_empty());
    assert_eq!(matches.score, 0);
}

#[tokio::test]
async fn empty_keyword_set_yields_empty_result() {
    let matches = scraper(MatchPolicy::Count)
        .run(job(STORY, FileFormat::Text, &[]))
        .await
        .unwrap();

    assert!(matches.sentences.is_empty());
}

#[tokio::test]
async fn all_policy_needs_every_keyword_in_one_sentence() {
    let scraper = scraper(MatchPolicy::All);

    let matches = scraper
        .run(job(STORY, FileFormat::Text, &["cat", "dog"]))
        .await
        .unwrap();
    assert!(matches.sentences.is_empty());

    let text = "The cat sat. The cat chased the dog. The dog slept.";
    let matches = scraper
        .run(job(text, FileFormat::Text, &["cat", "dog"]))
        .await
        .unwrap();
    assert_eq!(matches.sentences, vec!["The cat chased the dog."]);
    assert_eq!(matches.score, 2);
}

#[tokio::test]
async fn higher_scores_win_over_single_hits() {
    let text = "The cat sat. The cat chased the dog. The dog slept.";
    let matches = scraper(MatchPolicy::Count)
        .run(job(text, FileFormat::Text, &["cat", "dog"]))
        .await
        .unwrap();

    assert_eq!(matches.sentences, vec!["The cat chased the dog."]);
    assert_eq!(matches.score, 2);
}

#[tokio::test]
async fn invalid_utf8_text_is_corrupt_input() {
    let err = scraper(MatchPolicy::Count)
        .run(job(vec![0xff, 0xfe, 0x00], FileFormat::Text, &["dog"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::CorruptInput(_)));
}

#[tokio::test]
async fn running_twice_gives_the_same_result() {
    let scraper = scraper(MatchPolicy::Count);
    let first = scraper
        .run(job(STORY, FileFormat::Text, &["cat", "bird"]))
        .await
        .unwrap();
    let second = scraper
        .run(job(STORY, FileFormat::Text, &["cat", "bird"]))
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn docx_paragraphs_are_scored_with_a_global_maximum() {
    let bytes = docx(&[
        "Quarterly report. Revenue grew.",
        "   ",
        "",
        "Revenue and profit both grew. Staff numbers were flat.",
        "Profit margins narrowed.",
    ]);

    let matches = scraper(MatchPolicy::Count)
        .run(job(bytes, FileFormat::WordProcessor, &["revenue", "profit"]))
        .await
        .unwrap();

    assert_eq!(matches.sentences, vec!["Revenue and profit both grew."]);
    assert_eq!(matches.score, 2);
}

#[tokio::test]
async fn docx_repeated_sentences_are_returned_once() {
    let bytes = docx(&["The refrain returns.", "A verse.", "The refrain returns."]);

    let matches = scraper(MatchPolicy::Count)
        .run(job(bytes, FileFormat::WordProcessor, &["refrain"]))
        .await
        .unwrap();

    assert_eq!(matches.sentences, vec!["The refrain returns."]);
}

#[test]
fn docx_blank_paragraphs_produce_no_segments() {
    let bytes = docx(&["Only this one.", " ", "\t"]);
    let segments = papyrus_scraper::extract::docx_paragraphs(&bytes).unwrap();
    assert_eq!(segments, vec!["Only this one."]);
}

#[tokio::test]
async fn corrupt_docx_is_corrupt_input() {
    let err = scraper(MatchPolicy::Count)
        .run(job(b"not a zip archive".to_vec(), FileFormat::WordProcessor, &["x"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::CorruptInput(_)));
}

#[tokio::test]
async fn corrupt_pdf_is_corrupt_input() {
    let err = scraper(MatchPolicy::Count)
        .run(job(b"%PDF-1.5 garbage".to_vec(), FileFormat::Pdf, &["x"]))
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::CorruptInput(_)));
}

#[tokio::test]
async fn pdf_pages_come_back_in_page_order() {
    let bytes = pdf(&["First page text.", "Second page text.", "Third page text."]);
    let pool = papyrus_scraper::pool::WorkerPool::new(3);

    let pages = papyrus_scraper::extract::pdf_pages(bytes, &pool).await.unwrap();

    assert_eq!(pages.len(), 3);
    assert!(pages[0].contains("First"));
    assert!(pages[1].contains("Second"));
    assert!(pages[2].contains("Third"));
}

#[tokio::test]
async fn pdf_sentences_are_matched_across_pages() {
    let bytes = pdf(&["Nothing to see here.", "The invoice is overdue."]);

    let matches = scraper(MatchPolicy::Count)
        .run(job(bytes, FileFormat::Pdf, &["invoice"]))
        .await
        .unwrap();

    assert_eq!(matches.score, 1);
    assert_eq!(matches.sentences.len(), 1);
    assert!(matches.sentences[0].contains("The invoice is overdue."));
}

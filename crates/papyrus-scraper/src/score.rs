//! Fuzzy keyword scoring.
//!
//! A keyword is present in a sentence when at least one of the sentence's
//! whitespace-separated words is similar enough to it. Similarity is the
//! normalized Indel ratio on a 0–100 scale, which tolerates OCR noise,
//! typos and small inflection differences.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// How present keywords turn into a sentence score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Score is the number of keywords present.
    #[default]
    Count,
    /// Score is the keyword count when every keyword is present, otherwise 0.
    All,
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "count" => Ok(MatchPolicy::Count),
            "all" => Ok(MatchPolicy::All),
            other => Err(format!("unknown match policy: {other} (expected count or all)")),
        }
    }
}

/// Scores sentences against one immutable keyword set.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    keywords: Vec<String>,
    threshold: f64,
    policy: MatchPolicy,
}

impl KeywordScorer {
    /// Keywords are trimmed and lower-cased; blanks and duplicates are dropped
    /// (first occurrence wins).
    pub fn new<I, S>(keywords: I, threshold: f64, policy: MatchPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }

        Self {
            keywords: normalized,
            threshold,
            policy,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn score(&self, sentence: &str) -> usize {
        let lowered = sentence.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        if words.is_empty() {
            return 0;
        }

        let present = self
            .keywords
            .iter()
            .filter(|keyword| words.iter().any(|word| ratio(word, keyword) >= self.threshold))
            .count();

        match self.policy {
            MatchPolicy::Count => present,
            MatchPolicy::All if present == self.keywords.len() => present,
            MatchPolicy::All => 0,
        }
    }
}

/// Normalized Indel similarity of two strings, 0–100.
///
/// `100 * (1 - indel(a, b) / (|a| + |b|))` over Unicode scalar values, where
/// the Indel distance counts insertions and deletions only. Two empty
/// strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let lcs = longest_common_subsequence(&a, &b);
    100.0 * (2 * lcs) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; inner.len() + 1];

    for &x in outer {
        let mut diagonal = 0;
        for (j, &y) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    row[inner.len()]
}

use indexmap::IndexMap;

/// Sentence → score, in first-seen order.
///
/// Zero scores are never recorded. A sentence seen again keeps its first
/// position and the higher of the two scores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceScores {
    scores: IndexMap<String, usize>,
}

impl SentenceScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sentence: impl Into<String>, score: usize) {
        if score == 0 {
            return;
        }
        let entry = self.scores.entry(sentence.into()).or_insert(0);
        *entry = (*entry).max(score);
    }

    /// Fold another segment's scores in after this one's.
    pub fn merge(&mut self, other: SentenceScores) {
        for (sentence, score) in other.scores {
            self.record(sentence, score);
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn max_score(&self) -> usize {
        self.scores.values().copied().max().unwrap_or(0)
    }
}

impl FromIterator<(String, usize)> for SentenceScores {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut scores = SentenceScores::new();
        for (sentence, score) in iter {
            scores.record(sentence, score);
        }
        scores
    }
}

/// Every sentence sharing the maximum score, in first-seen order.
pub fn select(scores: &SentenceScores) -> Vec<String> {
    let max = scores.max_score();
    if max == 0 {
        return Vec::new();
    }

    scores
        .scores
        .iter()
        .filter(|(_, score)| **score == max)
        .map(|(sentence, _)| sentence.clone())
        .collect()
}

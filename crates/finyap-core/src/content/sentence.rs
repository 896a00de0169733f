use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// Stable sentence identifier (the database row id once synced).
pub type SentenceId = i64;

/// A playable sentence.
///
/// `words` keeps the original casing and punctuation for display;
/// `normalized` is index-aligned with it and is what guesses are matched
/// against. An empty normalized word is a punctuation-only token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    id: SentenceId,
    scenario: String,
    text: String,
    translation: String,
    words: Vec<String>,
    normalized: Vec<String>,
}

impl Sentence {
    /// Tokenize `text` on whitespace and build a sentence.
    ///
    /// Returns `None` when no token survives normalization, since such a
    /// sentence has nothing to guess.
    pub fn new(
        id: SentenceId,
        scenario: impl Into<String>,
        text: impl Into<String>,
        translation: impl Into<String>,
    ) -> Option<Self> {
        let text = text.into().trim().to_string();
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        let normalized: Vec<String> = words.iter().map(|w| normalize(w)).collect();
        if normalized.iter().all(String::is_empty) {
            return None;
        }
        Some(Self {
            id,
            scenario: scenario.into(),
            text,
            translation: translation.into().trim().to_string(),
            words,
            normalized,
        })
    }

    pub fn id(&self) -> SentenceId {
        self.id
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Source-language text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn normalized(&self) -> &[String] {
        &self.normalized
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the word at `index` needs a guess.
    pub fn is_guessable(&self, index: usize) -> bool {
        self.normalized.get(index).is_some_and(|w| !w.is_empty())
    }

    /// First guessable index at or after `from`.
    pub fn next_guessable(&self, from: usize) -> Option<usize> {
        (from..self.len()).find(|&i| self.is_guessable(i))
    }

    pub(crate) fn assign_id(&mut self, id: SentenceId) {
        self.id = id;
    }
}

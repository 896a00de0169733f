//! Per-sentence analytics records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::SentenceId;

/// One guess submission.
///
/// `user_input` is the raw text as typed, kept for later error review.
/// Serialized with the camelCase keys stored in `sentence_results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAttempt {
    pub word_index: usize,
    pub user_input: String,
    pub is_correct: bool,
    pub duration_ms: u64,
}

/// Single-guess log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessLog {
    pub sentence_id: SentenceId,
    pub correct: bool,
    pub at: DateTime<Utc>,
}

/// Summary of one completed sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceResult {
    pub sentence_id: SentenceId,
    pub success: bool,
    pub total_duration_ms: u64,
    pub attempts: Vec<WordAttempt>,
}

impl SentenceResult {
    /// Attempt list as stored in the `attempt_details` column.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn attempts_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.attempts)
    }
}

/// Fold a sentence's attempts into its result record.
pub fn aggregate(
    sentence_id: SentenceId,
    success: bool,
    attempts: Vec<WordAttempt>,
) -> SentenceResult {
    let total_duration_ms = attempts.iter().map(|a| a.duration_ms).sum();
    SentenceResult {
        sentence_id,
        success,
        total_duration_ms,
        attempts,
    }
}

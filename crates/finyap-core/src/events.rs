use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::SentenceId;
use crate::session::{GuessLog, SentenceResult};

/// Every transition of the session engine produces zero or more events.
///
/// `PlayLogged` and `ResultReady` are the persistence hand-off; they are
/// never produced during a recovery pass. The rest describe progress for
/// whoever is drawing the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PassStarted {
        pass: u32,
        recovery: bool,
        sentences: usize,
        at: DateTime<Utc>,
    },
    SentenceStarted {
        sentence_id: SentenceId,
        position: usize,
        at: DateTime<Utc>,
    },
    WordAccepted {
        sentence_id: SentenceId,
        word_index: usize,
        at: DateTime<Utc>,
    },
    WordMissed {
        sentence_id: SentenceId,
        word_index: usize,
        at: DateTime<Utc>,
    },
    /// Punctuation-only token revealed without a guess.
    WordSkipped {
        sentence_id: SentenceId,
        word_index: usize,
    },
    RoundOver {
        sentence_id: SentenceId,
        success: bool,
        at: DateTime<Utc>,
    },
    PlayLogged(GuessLog),
    ResultReady(SentenceResult),
    /// A pass finished without failures.
    SessionMastered {
        passes: u32,
        at: DateTime<Utc>,
    },
    SessionCancelled {
        at: DateTime<Utc>,
    },
}

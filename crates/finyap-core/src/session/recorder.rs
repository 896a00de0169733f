//! Persistence hand-off for session events.

use crate::error::Result;
use crate::events::Event;

use super::{GuessLog, SentenceResult};

/// Write-only sink for play history.
pub trait Recorder {
    /// Store a single guess.
    fn log_play(&self, log: &GuessLog) -> Result<()>;

    /// Store a completed sentence.
    fn log_sentence_result(&self, result: &SentenceResult) -> Result<()>;
}

/// Forward the persistence events in `events` to `recorder`.
///
/// Failures are logged and otherwise ignored; gameplay never waits on or
/// reacts to storage. Returns how many records were written.
pub fn dispatch<R: Recorder + ?Sized>(events: &[Event], recorder: &R) -> usize {
    let mut written = 0;
    for event in events {
        let outcome = match event {
            Event::PlayLogged(log) => recorder.log_play(log),
            Event::ResultReady(result) => recorder.log_sentence_result(result),
            _ => continue,
        };
        match outcome {
            Ok(()) => written += 1,
            Err(e) => tracing::warn!(error = %e, "failed to record play history"),
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, DatabaseError};
    use crate::session::aggregate;
    use chrono::Utc;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Memory {
        plays: RefCell<Vec<GuessLog>>,
        results: RefCell<Vec<SentenceResult>>,
    }

    impl Recorder for Memory {
        fn log_play(&self, log: &GuessLog) -> Result<()> {
            self.plays.borrow_mut().push(log.clone());
            Ok(())
        }

        fn log_sentence_result(&self, result: &SentenceResult) -> Result<()> {
            self.results.borrow_mut().push(result.clone());
            Ok(())
        }
    }

    struct Broken;

    impl Recorder for Broken {
        fn log_play(&self, _log: &GuessLog) -> Result<()> {
            Err(CoreError::Database(DatabaseError::Locked))
        }

        fn log_sentence_result(&self, _result: &SentenceResult) -> Result<()> {
            Err(CoreError::Database(DatabaseError::Locked))
        }
    }

    fn events() -> Vec<Event> {
        let at = Utc::now();
        vec![
            Event::PlayLogged(GuessLog {
                sentence_id: 1,
                correct: true,
                at,
            }),
            Event::WordAccepted {
                sentence_id: 1,
                word_index: 0,
                at,
            },
            Event::ResultReady(aggregate(1, true, Vec::new())),
        ]
    }

    #[test]
    fn forwards_persistence_events_only() {
        let memory = Memory::default();
        assert_eq!(dispatch(&events(), &memory), 2);
        assert_eq!(memory.plays.borrow().len(), 1);
        assert_eq!(memory.results.borrow().len(), 1);
    }

    #[test]
    fn storage_failures_are_swallowed() {
        assert_eq!(dispatch(&events(), &Broken), 0);
    }
}

//! Session engine implementation.
//!
//! The engine is a pure state machine driven by three inputs: a submitted
//! guess, an acknowledgement of a finished round, and cancellation. Each
//! input takes the current time explicitly and returns the events it caused.
//! Nothing here blocks or touches storage; persistence is handed off through
//! `Event::PlayLogged` and `Event::ResultReady`.
//!
//! ## State Transitions
//!
//! ```text
//! Playing(s, w) --correct, more words--> Playing(s, w+1)
//! Playing(s, w) --correct, last word---> RoundOver(s, true)
//! Playing(s, w) --wrong---------------> RoundOver(s, false)
//! RoundOver(s)  --ack, more sentences--> Playing(s+1, 0)
//! RoundOver(s)  --ack, pass over------> Playing(0, 0) of a recovery pass | Finished(Mastered)
//! any           --cancel--------------> Finished(Cancelled)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let (mut engine, events) =
//!     SessionEngine::start(&config, &catalog, CliticSet::default(), Utc::now())?;
//! let events = engine.submit("minä", Utc::now());
//! recorder::dispatch(&events, &db);
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::content::{Sentence, SentenceId};
use crate::error::ValidationError;
use crate::events::Event;
use crate::render::{word_view, WordState, WordView};
use crate::text::{diff, live_feedback, normalize, Annotated, CliticSet, Diff};

use super::analytics::{aggregate, GuessLog, WordAttempt};
use super::composer::{compose, SessionConfig, SessionQueue};
use super::recovery::{next_pass, NextPass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionEnd {
    /// A full pass finished without a single failure.
    Mastered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoundState {
    Playing { sentence: usize, word: usize },
    RoundOver { sentence: usize, success: bool },
    Finished { end: SessionEnd },
}

/// RNG used for composing and recovery shuffles.
pub fn session_rng(seed: Option<u64>) -> Mcg128Xsl64 {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

/// Owns all state of one running session.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    queue: SessionQueue,
    state: RoundState,
    /// Ids failed during the current pass.
    failures: BTreeSet<SentenceId>,
    /// Attempts for the sentence in progress.
    attempts: Vec<WordAttempt>,
    /// Word indices of the current sentence shown in plain text.
    revealed: BTreeSet<usize>,
    word_started_at: DateTime<Utc>,
    last_input: Option<String>,
    pass: u32,
    clitics: CliticSet,
    rng: Mcg128Xsl64,
}

impl SessionEngine {
    /// Compose the first queue from `config` and start playing it.
    ///
    /// # Errors
    /// Returns an error when the config is invalid or no sentence matches
    /// the selected scenarios.
    pub fn start(
        config: &SessionConfig,
        catalog: &[Sentence],
        clitics: CliticSet,
        at: DateTime<Utc>,
    ) -> Result<(Self, Vec<Event>), ValidationError> {
        config.validate()?;
        let mut rng = session_rng(config.seed);
        let queue = compose(&config.scenarios, config.per_scenario, catalog, &mut rng);
        if queue.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "no sentences for the selected scenarios".into(),
            ));
        }
        tracing::info!(
            scenarios = config.scenarios.len(),
            sentences = queue.len(),
            "session started"
        );
        Ok(Self::with_queue(queue, clitics, rng, at))
    }

    /// Start playing an already composed queue.
    pub fn with_queue(
        queue: SessionQueue,
        clitics: CliticSet,
        rng: Mcg128Xsl64,
        at: DateTime<Utc>,
    ) -> (Self, Vec<Event>) {
        let mut engine = Self {
            queue: SessionQueue::default(),
            state: RoundState::Playing {
                sentence: 0,
                word: 0,
            },
            failures: BTreeSet::new(),
            attempts: Vec::new(),
            revealed: BTreeSet::new(),
            word_started_at: at,
            last_input: None,
            pass: 0,
            clitics,
            rng,
        };
        let mut events = Vec::new();
        engine.begin_pass(queue, at, &mut events);
        (engine, events)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn is_recovery(&self) -> bool {
        self.queue.is_recovery()
    }

    /// 1-based pass number.
    pub fn pass(&self) -> u32 {
        self.pass
    }

    pub fn failures(&self) -> &BTreeSet<SentenceId> {
        &self.failures
    }

    pub fn attempts(&self) -> &[WordAttempt] {
        &self.attempts
    }

    pub fn revealed(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    /// Raw text of the most recent submission in this sentence.
    pub fn last_input(&self) -> Option<&str> {
        self.last_input.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RoundState::Finished { .. })
    }

    fn sentence_index(&self) -> Option<usize> {
        match self.state {
            RoundState::Playing { sentence, .. } | RoundState::RoundOver { sentence, .. } => {
                Some(sentence)
            }
            RoundState::Finished { .. } => None,
        }
    }

    pub fn current_sentence(&self) -> Option<&Sentence> {
        self.queue.get(self.sentence_index()?)
    }

    /// Index of the word awaiting a guess.
    pub fn word_index(&self) -> Option<usize> {
        match self.state {
            RoundState::Playing { word, .. } => Some(word),
            _ => None,
        }
    }

    /// 1-based position of the current sentence and the pass length.
    pub fn position(&self) -> Option<(usize, usize)> {
        Some((self.sentence_index()? + 1, self.queue.len()))
    }

    /// Sentences left in this pass, counting the current one.
    pub fn remaining(&self) -> usize {
        self.sentence_index()
            .map(|i| self.queue.len().saturating_sub(i))
            .unwrap_or(0)
    }

    /// Display model of the current sentence.
    pub fn words(&self) -> Vec<WordView> {
        let Some(sentence) = self.current_sentence() else {
            return Vec::new();
        };
        let current = self.word_index();
        sentence
            .words()
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let state = if self.revealed.contains(&i) {
                    WordState::Revealed
                } else if current == Some(i) {
                    WordState::Current
                } else {
                    WordState::Hidden
                };
                word_view(word, i, state, &self.clitics)
            })
            .collect()
    }

    /// Diff of the failing guess against the word it missed.
    pub fn review(&self) -> Option<Diff> {
        let RoundState::RoundOver { success: false, .. } = self.state else {
            return None;
        };
        let missed = self.attempts.last()?;
        let target = self.current_sentence()?.words().get(missed.word_index)?;
        Some(diff(&missed.user_input, target))
    }

    /// Live per-character feedback for a guess still being typed.
    pub fn feedback(&self, partial: &str) -> Option<Vec<Annotated>> {
        let word = self.word_index()?;
        let target = self.current_sentence()?.normalized().get(word)?;
        live_feedback(partial, target)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Submit a guess for the current word.
    ///
    /// A submission that normalizes to nothing is not a guess and changes
    /// nothing. Outside `Playing` this is a no-op.
    pub fn submit(&mut self, input: &str, at: DateTime<Utc>) -> Vec<Event> {
        let RoundState::Playing { sentence, word } = self.state else {
            return Vec::new();
        };
        let guess = normalize(input);
        if guess.is_empty() {
            return Vec::new();
        }
        let Some(current) = self.queue.get(sentence) else {
            return Vec::new();
        };
        let sentence_id = current.id();
        let correct = current.normalized().get(word).is_some_and(|t| *t == guess);
        let duration_ms = (at - self.word_started_at).num_milliseconds().max(0) as u64;

        self.attempts.push(WordAttempt {
            word_index: word,
            user_input: input.to_string(),
            is_correct: correct,
            duration_ms,
        });
        self.last_input = Some(input.to_string());

        let mut events = Vec::new();
        if !self.queue.is_recovery() {
            events.push(Event::PlayLogged(GuessLog {
                sentence_id,
                correct,
                at,
            }));
        }

        if correct {
            events.push(Event::WordAccepted {
                sentence_id,
                word_index: word,
                at,
            });
            self.revealed.insert(word);
            self.advance_to(sentence, word + 1, at, &mut events);
        } else {
            events.push(Event::WordMissed {
                sentence_id,
                word_index: word,
                at,
            });
            self.failures.insert(sentence_id);
            self.finish_round(sentence, false, at, &mut events);
        }
        events
    }

    /// Move past a finished round. Outside `RoundOver` this is a no-op.
    pub fn acknowledge(&mut self, at: DateTime<Utc>) -> Vec<Event> {
        let RoundState::RoundOver { sentence, .. } = self.state else {
            return Vec::new();
        };
        let mut events = Vec::new();
        let next = sentence + 1;
        if next < self.queue.len() {
            self.enter_sentence(next, at, &mut events);
        } else {
            self.finish_pass(at, &mut events);
        }
        events
    }

    /// Abort the session. Unaggregated attempts are discarded.
    pub fn cancel(&mut self, at: DateTime<Utc>) -> Vec<Event> {
        if self.is_finished() {
            return Vec::new();
        }
        self.attempts.clear();
        self.failures.clear();
        self.revealed.clear();
        self.state = RoundState::Finished {
            end: SessionEnd::Cancelled,
        };
        tracing::info!(pass = self.pass, "session cancelled");
        vec![Event::SessionCancelled { at }]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_pass(&mut self, queue: SessionQueue, at: DateTime<Utc>, events: &mut Vec<Event>) {
        self.pass += 1;
        self.failures.clear();
        self.queue = queue;
        tracing::debug!(
            pass = self.pass,
            recovery = self.queue.is_recovery(),
            sentences = self.queue.len(),
            "pass started"
        );
        events.push(Event::PassStarted {
            pass: self.pass,
            recovery: self.queue.is_recovery(),
            sentences: self.queue.len(),
            at,
        });
        if self.queue.is_empty() {
            self.finish_pass(at, events);
        } else {
            self.enter_sentence(0, at, events);
        }
    }

    fn enter_sentence(&mut self, index: usize, at: DateTime<Utc>, events: &mut Vec<Event>) {
        self.attempts.clear();
        self.revealed.clear();
        self.last_input = None;
        if let Some(sentence) = self.queue.get(index) {
            events.push(Event::SentenceStarted {
                sentence_id: sentence.id(),
                position: index,
                at,
            });
        }
        self.advance_to(index, 0, at, events);
    }

    /// Move the cursor to the first guessable word at or after `from`,
    /// revealing punctuation-only tokens on the way. Completes the round
    /// when no guessable word is left.
    fn advance_to(
        &mut self,
        index: usize,
        from: usize,
        at: DateTime<Utc>,
        events: &mut Vec<Event>,
    ) {
        let Some(sentence) = self.queue.get(index) else {
            return;
        };
        let sentence_id = sentence.id();
        let next = sentence.next_guessable(from);
        let stop = next.unwrap_or(sentence.len());

        for skipped in from..stop {
            self.revealed.insert(skipped);
            events.push(Event::WordSkipped {
                sentence_id,
                word_index: skipped,
            });
        }

        match next {
            Some(word) => {
                self.state = RoundState::Playing {
                    sentence: index,
                    word,
                };
                self.word_started_at = at;
            }
            None => self.finish_round(index, true, at, events),
        }
    }

    fn finish_round(
        &mut self,
        index: usize,
        success: bool,
        at: DateTime<Utc>,
        events: &mut Vec<Event>,
    ) {
        self.state = RoundState::RoundOver {
            sentence: index,
            success,
        };
        let Some(sentence_id) = self.queue.get(index).map(Sentence::id) else {
            return;
        };
        tracing::debug!(sentence_id, success, recovery = self.queue.is_recovery(), "round over");
        events.push(Event::RoundOver {
            sentence_id,
            success,
            at,
        });
        if !self.queue.is_recovery() {
            events.push(Event::ResultReady(aggregate(
                sentence_id,
                success,
                self.attempts.clone(),
            )));
        }
    }

    fn finish_pass(&mut self, at: DateTime<Utc>, events: &mut Vec<Event>) {
        match next_pass(&self.failures, self.queue.sentences(), &mut self.rng) {
            NextPass::Done => {
                self.attempts.clear();
                self.state = RoundState::Finished {
                    end: SessionEnd::Mastered,
                };
                tracing::info!(passes = self.pass, "session mastered");
                events.push(Event::SessionMastered {
                    passes: self.pass,
                    at,
                });
            }
            NextPass::Replay(queue) => self.begin_pass(queue, at, events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sentence(id: SentenceId, text: &str) -> Sentence {
        Sentence::new(id, "basics", text, "translation").unwrap()
    }

    fn engine_for(sentences: Vec<Sentence>) -> (SessionEngine, Vec<Event>) {
        let queue = SessionQueue::new(sentences);
        SessionEngine::with_queue(queue, CliticSet::default(), session_rng(Some(1)), t0())
    }

    fn results(events: &[Event]) -> Vec<&crate::session::SentenceResult> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::ResultReady(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starts_playing_first_word() {
        let (engine, events) = engine_for(vec![sentence(1, "Minä menen")]);
        assert_eq!(engine.state(), RoundState::Playing { sentence: 0, word: 0 });
        assert_eq!(engine.pass(), 1);
        assert!(matches!(
            events[0],
            Event::PassStarted {
                pass: 1,
                recovery: false,
                sentences: 1,
                ..
            }
        ));
    }

    #[test]
    fn correct_guesses_complete_round() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Minä menen")]);
        engine.submit("minä", t0() + Duration::seconds(2));
        assert_eq!(engine.state(), RoundState::Playing { sentence: 0, word: 1 });

        let events = engine.submit("Menen!", t0() + Duration::seconds(5));
        assert_eq!(engine.state(), RoundState::RoundOver { sentence: 0, success: true });
        let res = results(&events);
        assert_eq!(res.len(), 1);
        assert!(res[0].success);
        assert_eq!(res[0].attempts.len(), 2);
        assert_eq!(res[0].attempts[1].user_input, "Menen!");
        assert_eq!(res[0].attempts[0].duration_ms, 2000);
        assert_eq!(res[0].attempts[1].duration_ms, 3000);
        assert_eq!(res[0].total_duration_ms, 5000);
        assert!(engine.failures().is_empty());
    }

    #[test]
    fn wrong_guess_fails_immediately() {
        let (mut engine, _) = engine_for(vec![sentence(7, "Minä menen kotiin")]);
        engine.submit("minä", t0());
        let events = engine.submit("meen", t0());
        assert_eq!(engine.state(), RoundState::RoundOver { sentence: 0, success: false });
        assert!(engine.failures().contains(&7));
        let res = results(&events);
        assert_eq!(res[0].attempts.len(), 2);
        assert!(!res[0].attempts[1].is_correct);
        assert!(res[0].attempts.iter().all(|a| a.word_index <= 1));

        // Further guesses are ignored until acknowledged.
        assert!(engine.submit("kotiin", t0()).is_empty());
    }

    #[test]
    fn empty_submission_is_not_a_guess() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Minä menen")]);
        assert!(engine.submit("", t0()).is_empty());
        assert!(engine.submit("?!", t0()).is_empty());
        assert!(engine.submit("...", t0()).is_empty());
        assert!(engine.attempts().is_empty());
        assert_eq!(engine.state(), RoundState::Playing { sentence: 0, word: 0 });
    }

    #[test]
    fn punctuation_tokens_are_auto_revealed() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Hei , kaveri !")]);
        engine.submit("hei", t0());
        assert_eq!(engine.state(), RoundState::Playing { sentence: 0, word: 2 });
        assert!(engine.revealed().contains(&1));

        let events = engine.submit("kaveri", t0());
        assert_eq!(engine.state(), RoundState::RoundOver { sentence: 0, success: true });
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::WordSkipped { word_index: 3, .. })));
        assert_eq!(results(&events)[0].attempts.len(), 2);
    }

    #[test]
    fn acknowledge_moves_to_next_sentence() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Yksi"), sentence(2, "Kaksi")]);
        assert!(engine.acknowledge(t0()).is_empty());
        engine.submit("yksi", t0());
        engine.acknowledge(t0());
        assert_eq!(engine.state(), RoundState::Playing { sentence: 1, word: 0 });
        assert!(engine.attempts().is_empty());
        assert_eq!(engine.position(), Some((2, 2)));
        assert_eq!(engine.remaining(), 1);
    }

    #[test]
    fn clean_pass_masters_session() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Yksi")]);
        engine.submit("yksi", t0());
        let events = engine.acknowledge(t0());
        assert_eq!(engine.state(), RoundState::Finished { end: SessionEnd::Mastered });
        assert!(matches!(events.last(), Some(Event::SessionMastered { passes: 1, .. })));
    }

    #[test]
    fn failures_start_recovery_pass_without_persistence() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Yksi"), sentence(2, "Kaksi")]);
        engine.submit("yksi", t0());
        engine.acknowledge(t0());
        engine.submit("kolme", t0());
        let events = engine.acknowledge(t0());

        assert!(engine.is_recovery());
        assert_eq!(engine.pass(), 2);
        assert_eq!(engine.queue().len(), 1);
        assert!(engine.failures().is_empty());
        assert!(matches!(events[0], Event::PassStarted { pass: 2, recovery: true, .. }));

        let events = engine.submit("kaksi", t0());
        assert!(results(&events).is_empty());
        assert!(!events.iter().any(|e| matches!(e, Event::PlayLogged(_))));
        assert_eq!(engine.state(), RoundState::RoundOver { sentence: 0, success: true });

        engine.acknowledge(t0());
        assert_eq!(engine.state(), RoundState::Finished { end: SessionEnd::Mastered });
    }

    #[test]
    fn failing_recovery_spawns_another_recovery() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Yksi")]);
        engine.submit("x", t0());
        engine.acknowledge(t0());
        engine.submit("y", t0());
        engine.acknowledge(t0());
        assert_eq!(engine.pass(), 3);
        assert!(engine.is_recovery());
    }

    #[test]
    fn cancel_discards_in_flight_attempts() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Minä menen")]);
        engine.submit("minä", t0());
        let events = engine.cancel(t0());
        assert_eq!(events.len(), 1);
        assert!(engine.attempts().is_empty());
        assert_eq!(engine.state(), RoundState::Finished { end: SessionEnd::Cancelled });
        assert!(engine.submit("menen", t0()).is_empty());
        assert!(engine.cancel(t0()).is_empty());
    }

    #[test]
    fn review_diffs_missed_word() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Minä menen")]);
        engine.submit("minä", t0());
        engine.submit("meen", t0());
        let review = engine.review().unwrap();
        assert_eq!(review.input.len(), 4);
        assert_eq!(review.target.len(), 5);
        assert!(!review.is_exact());
    }

    #[test]
    fn words_mark_current_and_revealed() {
        let (mut engine, _) = engine_for(vec![sentence(1, "Minä menen kotiinkin")]);
        engine.submit("minä", t0());
        let words = engine.words();
        assert_eq!(words[0].state, WordState::Revealed);
        assert_eq!(words[0].text(), "Minä");
        assert_eq!(words[1].state, WordState::Current);
        assert_eq!(words[2].state, WordState::Hidden);
        assert_eq!(words[2].segments.len(), 2);
        assert!(engine.feedback("me").is_some());
    }

    #[test]
    fn empty_queue_is_mastered_immediately() {
        let (engine, events) = engine_for(Vec::new());
        assert_eq!(engine.state(), RoundState::Finished { end: SessionEnd::Mastered });
        assert!(matches!(events.last(), Some(Event::SessionMastered { .. })));
    }

    #[test]
    fn start_rejects_unplayable_config() {
        let catalog = vec![sentence(1, "Yksi")];
        let config = SessionConfig {
            scenarios: vec!["missing".into()],
            per_scenario: 3,
            seed: Some(1),
        };
        assert!(SessionEngine::start(&config, &catalog, CliticSet::default(), t0()).is_err());
    }
}

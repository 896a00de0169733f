//! Session engine and its collaborators.
//!
//! - [`compose`] builds the first queue from the selected scenarios
//! - [`SessionEngine`] runs the round state machine over that queue
//! - [`next_pass`] decides whether failed sentences get replayed
//! - [`aggregate`] folds a sentence's attempts into a [`SentenceResult`]
//! - [`recorder::dispatch`] forwards results to storage without ever
//!   letting a storage failure stop the game

mod analytics;
mod composer;
mod engine;
pub mod recorder;
mod recovery;

pub use analytics::{aggregate, GuessLog, SentenceResult, WordAttempt};
pub use composer::{compose, SessionConfig, SessionQueue};
pub use engine::{session_rng, RoundState, SessionEnd, SessionEngine};
pub use recorder::Recorder;
pub use recovery::{next_pass, NextPass};

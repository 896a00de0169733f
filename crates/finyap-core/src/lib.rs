//! # Finyap Core Library
//!
//! This library provides the core logic for finyap, a Finnish sentence
//! memorisation drill. The learner sees an English translation and a
//! silhouette of the Finnish sentence, then reconstructs it one word at a
//! time. Sentences missed during a pass are replayed until a pass finishes
//! without errors.
//!
//! ## Architecture
//!
//! - **Text**: normalization, clitic segmentation, vowel-class cipher and
//!   character diffs
//! - **Content**: scenario files, sentences, vocabulary and scenario stats
//! - **Session**: composition, the round state machine, recovery passes and
//!   analytics records
//! - **Storage**: SQLite play history and TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Round state machine
//! - [`Database`]: Play history persistence
//! - [`Config`]: Application configuration management
//! - [`Recorder`]: Sink for the persistence events an engine emits

pub mod content;
pub mod error;
pub mod events;
pub mod render;
pub mod session;
pub mod storage;
pub mod text;

pub use content::{load_dir, parse_scenario, ScenarioStat, Selection, Sentence, SentenceId};
pub use error::{ConfigError, ContentError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use render::{word_view, Segment, SegmentKind, WordState, WordView};
pub use session::{
    recorder, Recorder, RoundState, SentenceResult, SessionConfig, SessionEnd, SessionEngine,
    SessionQueue, WordAttempt,
};
pub use storage::{Config, Database};
pub use text::{cipher, normalize, CliticSet};

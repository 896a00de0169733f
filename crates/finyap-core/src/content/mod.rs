//! Sentence content: the data model, the scenario file loader, scenario
//! statistics used for selection, and the vocabulary pool.

mod loader;
mod sentence;
mod stats;
mod vocabulary;

pub use loader::{load_dir, parse_scenario};
pub use sentence::{Sentence, SentenceId};
pub use stats::{filter_stats, order_stats, ScenarioStat, Selection};
pub use vocabulary::vocabulary;

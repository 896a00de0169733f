//! Word transformation pipeline.
//!
//! Every function here is pure: inputs in, outputs out, no ambient state.
//! The session engine and the display model compose them.

mod cipher;
mod clitic;
mod diff;
mod normalize;

pub use cipher::{cipher, CONSONANT, FRONT_VOWEL, LOW_VOWEL, MID_VOWEL};
pub use clitic::{CliticSet, Segmented, DEFAULT_CLITICS};
pub use diff::{diff, live_feedback, Annotated, Diff, Mark};
pub use normalize::{is_guessable, normalize};

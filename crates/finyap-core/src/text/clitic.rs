//! Clitic (suffix particle) segmentation.
//!
//! Strips known particles off the end of a word until none match, so
//! stacked particles like `-kin` + `-han` are peeled one at a time.

use serde::{Deserialize, Serialize};

/// Default Finnish particles, checked in this order on every pass.
pub const DEFAULT_CLITICS: &[&str] = &[
    "kaan", "kään", "kin", "han", "hän", "ko", "kö", "pa", "pä",
];

/// A word split into its stem and trailing particles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmented {
    pub stem: String,
    /// Outer-to-inner in reading order: the particle closest to the stem first.
    pub clitics: Vec<String>,
}

/// Ordered list of particles to detach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliticSet {
    suffixes: Vec<String>,
}

impl Default for CliticSet {
    fn default() -> Self {
        Self::new(DEFAULT_CLITICS.iter().copied())
    }
}

impl CliticSet {
    /// Build a set from suffix strings. Empty entries are dropped since they
    /// would match every word forever.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = suffixes
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self { suffixes }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Split `word` into stem and particles.
    ///
    /// Each pass takes the first suffix in list order that matches
    /// case-insensitively. Detached particles keep their original casing.
    /// A word made entirely of particles ends up with an empty stem.
    pub fn segment(&self, word: &str) -> Segmented {
        let mut stem = word;
        let mut clitics: Vec<String> = Vec::new();

        loop {
            let found = self
                .suffixes
                .iter()
                .find_map(|suffix| split_suffix_ci(stem, suffix));
            match found {
                Some((head, tail)) => {
                    clitics.insert(0, tail.to_string());
                    stem = head;
                }
                None => break,
            }
        }

        Segmented {
            stem: stem.to_string(),
            clitics,
        }
    }
}

/// Split off the last `suffix.chars().count()` characters of `text` when
/// they equal `suffix` ignoring case.
fn split_suffix_ci<'a>(text: &'a str, suffix: &str) -> Option<(&'a str, &'a str)> {
    let n = suffix.chars().count();
    let (at, _) = text.char_indices().rev().nth(n.checked_sub(1)?)?;
    let (head, tail) = text.split_at(at);
    (tail.to_lowercase() == suffix).then_some((head, tail))
}
